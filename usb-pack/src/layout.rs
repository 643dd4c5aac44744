//! Walks over finished configuration descriptor sets.

use snafu::ensure;

use crate::descriptors::DescriptorType;
use crate::error::{Error, InvalidLengthSnafu, TruncatedSnafu};
use crate::pack::{to_array, Descriptor};

const CONFIGURATION: u8 = DescriptorType::Configuration as u8;
const INTERFACE: u8 = DescriptorType::Interface as u8;
const ENDPOINT: u8 = DescriptorType::Endpoint as u8;

/// What [`check_configuration`] learned about a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigurationLayout {
    pub total_length: u16,
    pub num_interfaces: u8,
    /// Interface descriptors including alternate settings.
    pub num_interface_descriptors: u16,
    pub num_endpoints: u16,
    pub num_descriptors: u16,
}

/// Checks that a configuration descriptor set is self-consistent.
pub const fn check_configuration(data: &[u8]) -> Result<ConfigurationLayout, Error> {
    if data.len() < 2 || data[1] != CONFIGURATION {
        return Err(Error::MissingConfiguration);
    }

    let mut layout = ConfigurationLayout {
        total_length: 0,
        num_interfaces: 0,
        num_interface_descriptors: 0,
        num_endpoints: 0,
        num_descriptors: 0,
    };
    // Once wTotalLength has matched, the set holds at most 32767 records,
    // so 16-bit counters cannot overflow.
    let mut interfaces_expected = 0;
    let mut interfaces_found: u16 = 0;
    let mut current_interface = 0;
    let mut endpoints_expected = 0;
    let mut endpoints_found: u16 = 0;

    let mut idx = 0;
    while idx < data.len() {
        let len = data[idx] as usize;
        if len < 2 {
            return Err(Error::InvalidLength { offset: idx, length: data[idx] });
        }
        if idx + len > data.len() {
            return Err(Error::Truncated { offset: idx });
        }

        match data[idx + 1] {
            CONFIGURATION if idx == 0 => {
                if len != 9 {
                    return Err(Error::InvalidLength { offset: idx, length: data[idx] });
                }
                let declared = u16::from_le_bytes([data[2], data[3]]);
                if declared as usize != data.len() {
                    return Err(Error::TotalLengthMismatch { declared, actual: data.len() });
                }
                layout.total_length = declared;
                interfaces_expected = data[4];
            }
            CONFIGURATION => return Err(Error::DuplicateConfiguration { offset: idx }),
            INTERFACE => {
                if len < 9 {
                    return Err(Error::InvalidLength { offset: idx, length: data[idx] });
                }
                if endpoints_found != endpoints_expected as u16 {
                    return Err(Error::EndpointCountMismatch {
                        interface: current_interface,
                        declared: endpoints_expected,
                        found: endpoints_found,
                    });
                }
                current_interface = data[idx + 2];
                // Alternate settings share their interface number.
                if data[idx + 3] == 0 {
                    interfaces_found += 1;
                }
                layout.num_interface_descriptors += 1;
                endpoints_expected = data[idx + 4];
                endpoints_found = 0;
            }
            ENDPOINT => {
                if len != 7 && len != 9 {
                    return Err(Error::InvalidLength { offset: idx, length: data[idx] });
                }
                endpoints_found += 1;
                layout.num_endpoints += 1;
            }
            _ => (),
        }

        layout.num_descriptors += 1;
        idx += len;
    }

    if endpoints_found != endpoints_expected as u16 {
        return Err(Error::EndpointCountMismatch {
            interface: current_interface,
            declared: endpoints_expected,
            found: endpoints_found,
        });
    }
    if interfaces_found != interfaces_expected as u16 {
        return Err(Error::InterfaceCountMismatch {
            declared: interfaces_expected,
            found: interfaces_found,
        });
    }
    layout.num_interfaces = interfaces_expected;

    Ok(layout)
}

/// Panics (fails const evaluation) if the set is not self-consistent.
pub const fn assert_configuration_valid(data: &[u8]) {
    if let Err(err) = check_configuration(data) {
        panic!("{}", err.message());
    }
}

/// [`to_array`] for configuration descriptor sets, with the set checked by
/// [`assert_configuration_valid`] on the way.
pub const fn checked_configuration<T: Descriptor, const N: usize>(set: T) -> [u8; N] {
    let data = to_array(set);
    assert_configuration_valid(&data);
    data
}

/// Offset of the descriptor of interface `number` (alternate setting 0).
pub const fn find_interface(data: &[u8], number: u8) -> Option<usize> {
    let mut idx = 0;
    while idx + 3 < data.len() {
        let len = data[idx] as usize;
        if len == 0 {
            return None;
        }

        if data[idx + 1] == INTERFACE && data[idx + 2] == number && data[idx + 3] == 0 {
            return Some(idx);
        }

        idx += len;
    }

    None
}

/// One record of a descriptor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDescriptor<'a> {
    pub offset: usize,
    pub descriptor_type: u8,
    pub bytes: &'a [u8],
}

impl<'a> RawDescriptor<'a> {
    pub fn kind(&self) -> Option<DescriptorType> {
        DescriptorType::from_u8(self.descriptor_type)
    }

    /// `bDescriptorSubType` of class-specific descriptors.
    pub fn sub_type(&self) -> Option<u8> {
        match self.kind() {
            Some(DescriptorType::ClassInterface | DescriptorType::ClassEndpoint) => {
                self.bytes.get(2).copied()
            }
            _ => None,
        }
    }
}

/// Iterator over the records of a descriptor set, in order.
///
/// Stops after the first error.
pub struct Records<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Records<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Records { data, offset: 0, failed: false }
    }

    fn read(&self) -> Result<RawDescriptor<'a>, Error> {
        let offset = self.offset;
        let rest = &self.data[offset..];

        ensure!(rest.len() >= 2, TruncatedSnafu { offset });
        let len = rest[0] as usize;
        ensure!(len >= 2, InvalidLengthSnafu { offset, length: rest[0] });
        ensure!(len <= rest.len(), TruncatedSnafu { offset });

        Ok(RawDescriptor {
            offset,
            descriptor_type: rest[1],
            bytes: &rest[..len],
        })
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<RawDescriptor<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        let record = self.read();
        match &record {
            Ok(raw) => self.offset += raw.bytes.len(),
            Err(_) => self.failed = true,
        }
        Some(record)
    }
}
