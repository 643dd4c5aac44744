use core::mem::size_of;

use bitfield::bitfield;
use bitflags::bitflags;
use static_assertions::assert_eq_size;
use zerocopy::{AsBytes, Unaligned};

use crate::pack::{Descriptor, Pack};
use crate::word::{word, WordLe};

mod cdc;
mod hid;

pub use cdc::*;
pub use hid::*;

/// Value of `bDescriptorType`.
///
/// Table 9-5 of the USB 2.0 spec, plus the class codes used by this crate.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescriptorType {
    Device = 0x01,
    Configuration = 0x02,
    String = 0x03,
    Interface = 0x04,
    Endpoint = 0x05,
    DeviceQualifier = 0x06,
    OtherSpeedConfiguration = 0x07,
    InterfacePower = 0x08,
    InterfaceAssociation = 0x0B,
    Hid = 0x21,
    HidReport = 0x22,
    ClassInterface = 0x24,
    ClassEndpoint = 0x25,
}

impl DescriptorType {
    pub const fn from_u8(value: u8) -> Option<DescriptorType> {
        Some(match value {
            0x01 => DescriptorType::Device,
            0x02 => DescriptorType::Configuration,
            0x03 => DescriptorType::String,
            0x04 => DescriptorType::Interface,
            0x05 => DescriptorType::Endpoint,
            0x06 => DescriptorType::DeviceQualifier,
            0x07 => DescriptorType::OtherSpeedConfiguration,
            0x08 => DescriptorType::InterfacePower,
            0x0B => DescriptorType::InterfaceAssociation,
            0x21 => DescriptorType::Hid,
            0x22 => DescriptorType::HidReport,
            0x24 => DescriptorType::ClassInterface,
            0x25 => DescriptorType::ClassEndpoint,
            _ => return None,
        })
    }
}

impl From<DescriptorType> for u8 {
    fn from(descriptor_type: DescriptorType) -> u8 {
        descriptor_type as u8
    }
}

// Table 9-8 of the USB 2.0 spec
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct DeviceDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub bcd_usb: WordLe,
    pub device_class: u8,
    pub device_sub_class: u8,
    pub device_protocol: u8,
    pub max_packet_size0: u8,
    pub id_vendor: WordLe,
    pub id_product: WordLe,
    pub bcd_device: WordLe,
    pub manufacturer_str_index: u8,
    pub product_str_index: u8,
    pub serial_number_str_index: u8,
    pub num_configurations: u8,
}

impl Descriptor for DeviceDescriptor {}
assert_eq_size!(DeviceDescriptor, [u8; 18]);

/// Caller-supplied part of a [`DeviceDescriptor`].
#[derive(Debug, Clone, Copy)]
pub struct Device {
    pub bcd_usb: u16,
    pub device_class: u8,
    pub device_sub_class: u8,
    pub device_protocol: u8,
    pub max_packet_size0: u8,
    pub id_vendor: u16,
    pub id_product: u16,
    pub bcd_device: u16,
    pub manufacturer_str_index: u8,
    pub product_str_index: u8,
    pub serial_number_str_index: u8,
    pub num_configurations: u8,
}

impl Device {
    pub const fn build(self) -> DeviceDescriptor {
        DeviceDescriptor {
            length: size_of::<DeviceDescriptor>() as u8,
            descriptor_type: DescriptorType::Device as u8,
            bcd_usb: word(self.bcd_usb),
            device_class: self.device_class,
            device_sub_class: self.device_sub_class,
            device_protocol: self.device_protocol,
            max_packet_size0: self.max_packet_size0,
            id_vendor: word(self.id_vendor),
            id_product: word(self.id_product),
            bcd_device: word(self.bcd_device),
            manufacturer_str_index: self.manufacturer_str_index,
            product_str_index: self.product_str_index,
            serial_number_str_index: self.serial_number_str_index,
            num_configurations: self.num_configurations,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConfigurationAttributes: u8 {
        /// Reserved, must always be set.
        const BUS_POWERED   = 0b1000_0000;
        const SELF_POWERED  = 0b0100_0000;
        const REMOTE_WAKEUP = 0b0010_0000;
    }
}

// Table 9-10 of the USB 2.0 spec
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct ConfigurationDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    /// Length of this descriptor plus everything that follows it in the set.
    pub total_length: WordLe,
    pub num_interfaces: u8,
    pub configuration_value: u8,
    pub configuration_str_index: u8,
    pub attributes: u8,
    /// In units of 2mA.
    pub max_power: u8,
}

impl Descriptor for ConfigurationDescriptor {}
assert_eq_size!(ConfigurationDescriptor, [u8; 9]);

/// Caller-supplied part of a [`ConfigurationDescriptor`].
///
/// Use [`configuration!`](crate::configuration) to attach the interfaces,
/// the total length is then derived from the resulting set.
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub num_interfaces: u8,
    pub configuration_value: u8,
    pub configuration_str_index: u8,
    pub attributes: ConfigurationAttributes,
    pub max_power: u8,
}

impl Configuration {
    const fn record(self, total_length: usize) -> ConfigurationDescriptor {
        assert!(
            total_length <= u16::MAX as usize,
            "configuration descriptor set is larger than 65535 bytes"
        );

        ConfigurationDescriptor {
            length: size_of::<ConfigurationDescriptor>() as u8,
            descriptor_type: DescriptorType::Configuration as u8,
            total_length: word(total_length as u16),
            num_interfaces: self.num_interfaces,
            configuration_value: self.configuration_value,
            configuration_str_index: self.configuration_str_index,
            attributes: self.attributes.bits(),
            max_power: self.max_power,
        }
    }

    /// A configuration descriptor with nothing after it.
    pub const fn header(self) -> ConfigurationDescriptor {
        self.record(size_of::<ConfigurationDescriptor>())
    }

    /// The configuration descriptor followed by `rest`.
    ///
    /// `total_length` is the size of the returned set.
    pub const fn with<R: Descriptor>(self, rest: R) -> Pack<ConfigurationDescriptor, R> {
        let total_length = size_of::<Pack<ConfigurationDescriptor, R>>();
        Pack::new(self.record(total_length), rest)
    }
}

/// Builds a configuration descriptor set: the header, then every
/// subordinate descriptor in the order given.
#[macro_export]
macro_rules! configuration {
    ($config:expr $(,)?) => {
        $config.header()
    };
    ($config:expr, $($rest:expr),+ $(,)?) => {
        $config.with($crate::pack!($($rest),+))
    };
}

// Table 9-12 of the USB 2.0 spec
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct InterfaceDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub interface_number: u8,
    pub alternate_setting: u8,
    pub num_endpoints: u8,
    pub interface_class: u8,
    pub interface_sub_class: u8,
    pub interface_protocol: u8,
    pub interface_str_index: u8,
}

impl Descriptor for InterfaceDescriptor {}
assert_eq_size!(InterfaceDescriptor, [u8; 9]);

#[derive(Debug, Clone, Copy)]
pub struct Interface {
    pub interface_number: u8,
    pub alternate_setting: u8,
    pub num_endpoints: u8,
    pub interface_class: u8,
    pub interface_sub_class: u8,
    pub interface_protocol: u8,
    pub interface_str_index: u8,
}

impl Interface {
    pub const fn header(self) -> InterfaceDescriptor {
        InterfaceDescriptor {
            length: size_of::<InterfaceDescriptor>() as u8,
            descriptor_type: DescriptorType::Interface as u8,
            interface_number: self.interface_number,
            alternate_setting: self.alternate_setting,
            num_endpoints: self.num_endpoints,
            interface_class: self.interface_class,
            interface_sub_class: self.interface_sub_class,
            interface_protocol: self.interface_protocol,
            interface_str_index: self.interface_str_index,
        }
    }

    /// The interface descriptor followed by its endpoints and class
    /// descriptors.
    pub const fn with<R: Descriptor>(self, rest: R) -> Pack<InterfaceDescriptor, R> {
        Pack::new(self.header(), rest)
    }
}

/// Builds an interface descriptor followed by its subordinate descriptors.
#[macro_export]
macro_rules! interface {
    ($iface:expr $(,)?) => {
        $iface.header()
    };
    ($iface:expr, $($rest:expr),+ $(,)?) => {
        $iface.with($crate::pack!($($rest),+))
    };
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransferType {
    Control = 0b00,
    Isochronous = 0b01,
    Bulk = 0b10,
    Interrupt = 0b11,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Synchronization {
    None = 0b00,
    Asynchronous = 0b01,
    Adaptive = 0b10,
    Synchronous = 0b11,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Usage {
    Data = 0b00,
    Feedback = 0b01,
    ImplicitFeedbackData = 0b10,
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct EndpointAttributes(u8);
    impl Debug;
    pub transfer_type, _: 1, 0;
    pub synchronisation_type, _: 3, 2;
    pub usage_type, _: 5, 4;
}

impl EndpointAttributes {
    pub const CONTROL: Self = Self::new(TransferType::Control, Synchronization::None, Usage::Data);
    pub const BULK: Self = Self::new(TransferType::Bulk, Synchronization::None, Usage::Data);
    pub const INTERRUPT: Self = Self::new(TransferType::Interrupt, Synchronization::None, Usage::Data);

    pub const fn new(transfer: TransferType, sync: Synchronization, usage: Usage) -> Self {
        Self(transfer as u8 | (sync as u8) << 2 | (usage as u8) << 4)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn transfer(&self) -> TransferType {
        match self.transfer_type() {
            0b00 => TransferType::Control,
            0b01 => TransferType::Isochronous,
            0b10 => TransferType::Bulk,
            _ => TransferType::Interrupt,
        }
    }
}

// Table 9-13 of the USB 2.0 spec
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct EndpointDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    /// Bit 7 is the direction (set for IN), bits 3..0 the endpoint number.
    pub endpoint_address: u8,
    pub attributes: u8,
    pub max_packet_size: WordLe,
    pub interval: u8,
}

impl Descriptor for EndpointDescriptor {}
assert_eq_size!(EndpointDescriptor, [u8; 7]);

impl EndpointDescriptor {
    pub const fn is_in(&self) -> bool {
        self.endpoint_address & 0x80 != 0
    }

    pub fn transfer_type(&self) -> TransferType {
        EndpointAttributes::from_bits(self.attributes).transfer()
    }
}

/// Endpoint descriptor carrying the two trailing fields of the audio class
/// (USB Audio 1.0, table 4-20).
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct SyncEndpointDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub endpoint_address: u8,
    pub attributes: u8,
    pub max_packet_size: WordLe,
    pub interval: u8,
    pub refresh: u8,
    pub synch_address: u8,
}

impl Descriptor for SyncEndpointDescriptor {}
assert_eq_size!(SyncEndpointDescriptor, [u8; 9]);

#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub address: u8,
    pub attributes: EndpointAttributes,
    pub max_packet_size: u16,
    pub interval: u8,
}

impl Endpoint {
    pub const fn build(self) -> EndpointDescriptor {
        EndpointDescriptor {
            length: size_of::<EndpointDescriptor>() as u8,
            descriptor_type: DescriptorType::Endpoint as u8,
            endpoint_address: self.address,
            attributes: self.attributes.bits(),
            max_packet_size: word(self.max_packet_size),
            interval: self.interval,
        }
    }

    pub const fn with_sync(self, refresh: u8, synch_address: u8) -> SyncEndpointDescriptor {
        SyncEndpointDescriptor {
            length: size_of::<SyncEndpointDescriptor>() as u8,
            descriptor_type: DescriptorType::Endpoint as u8,
            endpoint_address: self.address,
            attributes: self.attributes.bits(),
            max_packet_size: word(self.max_packet_size),
            interval: self.interval,
            refresh,
            synch_address,
        }
    }
}

/// Groups consecutive interfaces into one function of a composite device.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, Unaligned)]
pub struct InterfaceAssociationDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub first_interface: u8,
    pub interface_count: u8,
    pub function_class: u8,
    pub function_sub_class: u8,
    pub function_protocol: u8,
    pub function_str_index: u8,
}

impl Descriptor for InterfaceAssociationDescriptor {}
assert_eq_size!(InterfaceAssociationDescriptor, [u8; 8]);

#[derive(Debug, Clone, Copy)]
pub struct InterfaceAssociation {
    pub first_interface: u8,
    pub interface_count: u8,
    pub function_class: u8,
    pub function_sub_class: u8,
    pub function_protocol: u8,
    pub function_str_index: u8,
}

impl InterfaceAssociation {
    pub const fn build(self) -> InterfaceAssociationDescriptor {
        InterfaceAssociationDescriptor {
            length: size_of::<InterfaceAssociationDescriptor>() as u8,
            descriptor_type: DescriptorType::InterfaceAssociation as u8,
            first_interface: self.first_interface,
            interface_count: self.interface_count,
            function_class: self.function_class,
            function_sub_class: self.function_sub_class,
            function_protocol: self.function_protocol,
            function_str_index: self.function_str_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::to_array;

    const HID_INTERFACE: Interface = Interface {
        interface_number: 0,
        alternate_setting: 0,
        num_endpoints: 1,
        interface_class: 0x03,
        interface_sub_class: 0,
        interface_protocol: 0,
        interface_str_index: 0,
    };

    const HID_ENDPOINT: Endpoint = Endpoint {
        address: 0x81,
        attributes: EndpointAttributes::INTERRUPT,
        max_packet_size: 8,
        interval: 10,
    };

    const CONFIG: Configuration = Configuration {
        num_interfaces: 1,
        configuration_value: 1,
        configuration_str_index: 0,
        attributes: ConfigurationAttributes::BUS_POWERED,
        max_power: 0x32,
    };

    #[test]
    fn test_device_descriptor() {
        let device = Device {
            bcd_usb: 0x0200,
            device_class: 0xEF,
            device_sub_class: 0x02,
            device_protocol: 0x01,
            max_packet_size0: 0x40,
            id_vendor: 0x28de,
            id_product: 0x1002,
            bcd_device: 0x0100,
            manufacturer_str_index: 1,
            product_str_index: 2,
            serial_number_str_index: 0,
            num_configurations: 1,
        }
        .build();

        assert_eq!(
            device.as_bytes(),
            &[
                18, 0x01, 0x00, 0x02, 0xEF, 0x02, 0x01, 0x40, 0xde, 0x28, 0x02, 0x10, 0x00, 0x01,
                1, 2, 0, 1
            ]
        );
    }

    #[test]
    fn test_endpoint_descriptor() {
        assert_eq!(
            HID_ENDPOINT.build().as_bytes(),
            &[0x07, 0x05, 0x81, 0x03, 0x08, 0x00, 0x0A]
        );
        assert!(HID_ENDPOINT.build().is_in());
        assert_eq!(HID_ENDPOINT.build().transfer_type(), TransferType::Interrupt);
    }

    #[test]
    fn test_endpoint_sync_fields_default_to_zero() {
        assert_eq!(
            HID_ENDPOINT.with_sync(0, 0).as_bytes(),
            &[0x09, 0x05, 0x81, 0x03, 0x08, 0x00, 0x0A, 0x00, 0x00]
        );
        assert_eq!(HID_ENDPOINT.with_sync(3, 0x02).as_bytes()[7..], [3, 0x02]);
    }

    #[test]
    fn test_lengths_and_tags() {
        let config = CONFIG.header();
        assert_eq!(config.length as usize, ConfigurationDescriptor::LEN);
        assert_eq!(config.descriptor_type, DescriptorType::Configuration as u8);
        assert_eq!(config.total_length.get(), 9);

        let iface = HID_INTERFACE.header();
        assert_eq!(iface.length as usize, InterfaceDescriptor::LEN);
        assert_eq!(iface.descriptor_type, 0x04);

        let endpoint = HID_ENDPOINT.build();
        assert_eq!(endpoint.length as usize, EndpointDescriptor::LEN);
        assert_eq!(endpoint.descriptor_type, 0x05);

        let iad = InterfaceAssociation {
            first_interface: 1,
            interface_count: 2,
            function_class: 0x02,
            function_sub_class: 0x02,
            function_protocol: 0,
            function_str_index: 4,
        }
        .build();
        assert_eq!(iad.as_bytes(), &[8, 0x0B, 1, 2, 0x02, 0x02, 0, 4]);
    }

    #[test]
    fn test_configuration_total_length() {
        let set = configuration!(CONFIG, interface!(HID_INTERFACE, HID_ENDPOINT.build()));
        let bytes = set.as_bytes();
        assert_eq!(bytes.len(), 25);
        assert_eq!(set.head().total_length.get(), 25);
        assert_eq!(&bytes[..4], &[0x09, 0x02, 25, 0]);
        assert_eq!(&bytes[9..11], &[0x09, 0x04]);
        assert_eq!(&bytes[18..20], &[0x07, 0x05]);
    }

    #[test]
    fn test_configuration_without_subordinates() {
        let lone: ConfigurationDescriptor = configuration!(CONFIG);
        assert_eq!(lone, CONFIG.header());
        assert_eq!(lone.as_bytes(), &[9, 2, 9, 0, 1, 1, 0, 0x80, 0x32]);
    }

    #[test]
    fn test_single_interface_matches_header() {
        let iface: InterfaceDescriptor = interface!(HID_INTERFACE);
        assert_eq!(iface, HID_INTERFACE.header());
    }

    #[test]
    fn test_subordinate_order_is_preserved() {
        let in_ep = HID_ENDPOINT.build();
        let out_ep = Endpoint {
            address: 0x02,
            attributes: EndpointAttributes::BULK,
            max_packet_size: 64,
            interval: 0,
        }
        .build();
        let header = HID_INTERFACE.header();

        let forward: [u8; 23] = to_array(interface!(HID_INTERFACE, in_ep, out_ep));
        let swapped: [u8; 23] = to_array(interface!(HID_INTERFACE, out_ep, in_ep));

        assert_eq!(&forward[..9], header.as_bytes());
        assert_eq!(&forward[..9], &swapped[..9]);
        assert_eq!(&forward[9..16], in_ep.as_bytes());
        assert_eq!(&forward[16..], out_ep.as_bytes());
        assert_eq!(&swapped[9..16], out_ep.as_bytes());
        assert_eq!(&swapped[16..], in_ep.as_bytes());
    }

    #[test]
    fn test_configuration_attributes() {
        let config = Configuration {
            attributes: ConfigurationAttributes::BUS_POWERED | ConfigurationAttributes::REMOTE_WAKEUP,
            ..CONFIG
        };
        assert_eq!(config.header().attributes, 0xA0);
    }

    #[test]
    fn test_endpoint_attributes() {
        let attributes =
            EndpointAttributes::new(TransferType::Isochronous, Synchronization::Adaptive, Usage::Feedback);
        assert_eq!(attributes.bits(), 0b0001_1001);
        assert_eq!(attributes.transfer(), TransferType::Isochronous);
        assert_eq!(attributes.synchronisation_type(), 0b10);
        assert_eq!(attributes.usage_type(), 0b01);
        assert_eq!(EndpointAttributes::from_bits(0x02).transfer(), TransferType::Bulk);
    }

    #[test]
    fn test_descriptor_type_round_trip() {
        assert_eq!(DescriptorType::from_u8(0x24), Some(DescriptorType::ClassInterface));
        assert_eq!(DescriptorType::from_u8(0x0B), Some(DescriptorType::InterfaceAssociation));
        assert_eq!(DescriptorType::from_u8(0x42), None);
    }

    #[test]
    #[should_panic(expected = "larger than 65535 bytes")]
    fn test_total_length_overflow() {
        #[repr(C, packed)]
        #[derive(Clone, Copy, AsBytes, Unaligned)]
        struct Huge([u8; 70_000]);
        impl Descriptor for Huge {}

        let _ = CONFIG.with(Huge([0; 70_000]));
    }
}
