use snafu::Snafu;

/// A configuration descriptor set that does not describe itself correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("descriptor at offset {offset} runs past the end of the set"))]
    Truncated { offset: usize },

    #[snafu(display("descriptor at offset {offset} has invalid length {length}"))]
    InvalidLength { offset: usize, length: u8 },

    #[snafu(display("set does not start with a configuration descriptor"))]
    MissingConfiguration,

    #[snafu(display("second configuration descriptor at offset {offset}"))]
    DuplicateConfiguration { offset: usize },

    #[snafu(display("total length is {declared} but the set is {actual} bytes"))]
    TotalLengthMismatch { declared: u16, actual: usize },

    #[snafu(display("configuration declares {declared} interfaces, found {found}"))]
    InterfaceCountMismatch { declared: u8, found: u16 },

    #[snafu(display("interface {interface} declares {declared} endpoints, found {found}"))]
    EndpointCountMismatch { interface: u8, declared: u8, found: u16 },
}

impl Error {
    /// Static description, usable from const panics.
    pub const fn message(&self) -> &'static str {
        match self {
            Error::Truncated { .. } => "descriptor runs past the end of the set",
            Error::InvalidLength { .. } => "descriptor has an invalid length",
            Error::MissingConfiguration => "set does not start with a configuration descriptor",
            Error::DuplicateConfiguration { .. } => "multiple configuration descriptors found",
            Error::TotalLengthMismatch { .. } => {
                "configuration total length does not match the set length"
            }
            Error::InterfaceCountMismatch { .. } => {
                "number of interfaces mismatches between configuration descriptor and set"
            }
            Error::EndpointCountMismatch { .. } => {
                "number of endpoints mismatches between interface descriptor and set"
            }
        }
    }
}
