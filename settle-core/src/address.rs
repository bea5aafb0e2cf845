//! Fake destination addresses for the demo checkout.

use rand::Rng;

/// `0x` followed by 40 random lowercase hex digits.
///
/// The address is never funded or watched; it only fills the QR code
/// and the copy field of the checkout.
pub fn generate_payment_address() -> String {
    let mut bytes = [0u8; 20];
    rand::rng().fill(&mut bytes[..]);

    let mut address = String::with_capacity(42);
    address.push_str("0x");
    for byte in bytes {
        address.push_str(&format!("{byte:02x}"));
    }
    address
}
