//! Functional descriptors of the Communications Device Class (CDC 1.2,
//! section 5.2.3). They sit after the communication interface descriptor
//! and before its notification endpoint.

use core::mem::size_of;

use static_assertions::assert_eq_size;
use zerocopy::{AsBytes, Unaligned};

use super::DescriptorType;
use crate::pack::Descriptor;
use crate::word::{word, WordLe};

const CS_INTERFACE: u8 = DescriptorType::ClassInterface as u8;

pub const CS_HEADER: u8 = 0x00;
pub const CS_CALL_MANAGEMENT: u8 = 0x01;
pub const CS_ABSTRACT_CONTROL_MANAGEMENT: u8 = 0x02;
pub const CS_UNION: u8 = 0x06;

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct CdcHeaderDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub descriptor_sub_type: u8,
    pub bcd_cdc: WordLe,
}

impl Descriptor for CdcHeaderDescriptor {}
assert_eq_size!(CdcHeaderDescriptor, [u8; 5]);

impl CdcHeaderDescriptor {
    pub const fn new(bcd_cdc: u16) -> Self {
        CdcHeaderDescriptor {
            length: size_of::<Self>() as u8,
            descriptor_type: CS_INTERFACE,
            descriptor_sub_type: CS_HEADER,
            bcd_cdc: word(bcd_cdc),
        }
    }
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct CdcCallManagementDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub descriptor_sub_type: u8,
    /// D0: device handles call management itself, D1: over the data interface.
    pub capabilities: u8,
    pub data_interface: u8,
}

impl Descriptor for CdcCallManagementDescriptor {}
assert_eq_size!(CdcCallManagementDescriptor, [u8; 5]);

impl CdcCallManagementDescriptor {
    pub const fn new(capabilities: u8, data_interface: u8) -> Self {
        CdcCallManagementDescriptor {
            length: size_of::<Self>() as u8,
            descriptor_type: CS_INTERFACE,
            descriptor_sub_type: CS_CALL_MANAGEMENT,
            capabilities,
            data_interface,
        }
    }
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct CdcAcmDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub descriptor_sub_type: u8,
    pub capabilities: u8,
}

impl Descriptor for CdcAcmDescriptor {}
assert_eq_size!(CdcAcmDescriptor, [u8; 4]);

impl CdcAcmDescriptor {
    pub const fn new(capabilities: u8) -> Self {
        CdcAcmDescriptor {
            length: size_of::<Self>() as u8,
            descriptor_type: CS_INTERFACE,
            descriptor_sub_type: CS_ABSTRACT_CONTROL_MANAGEMENT,
            capabilities,
        }
    }
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct CdcUnionDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub descriptor_sub_type: u8,
    pub control_interface: u8,
    pub subordinate_interface0: u8,
}

impl Descriptor for CdcUnionDescriptor {}
assert_eq_size!(CdcUnionDescriptor, [u8; 5]);

impl CdcUnionDescriptor {
    pub const fn new(control_interface: u8, subordinate_interface0: u8) -> Self {
        CdcUnionDescriptor {
            length: size_of::<Self>() as u8,
            descriptor_type: CS_INTERFACE,
            descriptor_sub_type: CS_UNION,
            control_interface,
            subordinate_interface0,
        }
    }
}
