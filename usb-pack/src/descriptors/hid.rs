use core::mem::size_of;

use static_assertions::assert_eq_size;
use zerocopy::{AsBytes, Unaligned};

use super::DescriptorType;
use crate::pack::Descriptor;
use crate::word::{word, WordLe};

/// HID class descriptor with a single report descriptor entry
/// (HID 1.11, section 6.2.1).
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct HidDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub bcd_hid: WordLe,
    pub country_code: u8,
    pub num_descriptors: u8,
    pub report_descriptor_type: u8,
    pub report_descriptor_length: WordLe,
}

impl Descriptor for HidDescriptor {}
assert_eq_size!(HidDescriptor, [u8; 9]);

impl HidDescriptor {
    pub const fn new(bcd_hid: u16, country_code: u8, report_descriptor_length: u16) -> Self {
        HidDescriptor {
            length: size_of::<Self>() as u8,
            descriptor_type: DescriptorType::Hid as u8,
            bcd_hid: word(bcd_hid),
            country_code,
            num_descriptors: 1,
            report_descriptor_type: DescriptorType::HidReport as u8,
            report_descriptor_length: word(report_descriptor_length),
        }
    }
}
