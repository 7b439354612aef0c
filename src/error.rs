/// Errors raised for input that does not describe a permutation or a valid
/// Lehmer code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("The value at position {position} occurs more than once.")]
    DuplicateValue { position: usize },
    #[error("Malformed permutation element {token:?}.")]
    MalformedToken { token: String },
    #[error("Digit {digit} at position {position} exceeds its maximum of {max}.")]
    DigitOutOfRange { position: usize, digit: usize, max: usize },
    #[error("The permutation index does not fit into 128 bits.")]
    IndexOverflow,
}
