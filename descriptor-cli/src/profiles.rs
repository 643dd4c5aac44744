use usb_pack::*;

pub struct Profile {
    pub name: &'static str,
    pub about: &'static str,
    pub device: &'static [u8],
    pub configuration: &'static [u8],
}

pub static PROFILES: &[Profile] = &[
    Profile {
        name: "cdc-acm",
        about: "single-function virtual serial port",
        device: &cdc_acm::DEVICE_DESCRIPTOR,
        configuration: &cdc_acm::CONFIGURATION_DESCRIPTOR,
    },
    Profile {
        name: "hid-cdc",
        about: "composite vendor HID interface plus a CDC-ACM debug port",
        device: &hid_cdc::DEVICE_DESCRIPTOR,
        configuration: &hid_cdc::CONFIGURATION_DESCRIPTOR,
    },
];

pub fn find(name: &str) -> Option<&'static Profile> {
    PROFILES.iter().find(|profile| profile.name == name)
}

pub fn names() -> Vec<&'static str> {
    PROFILES.iter().map(|profile| profile.name).collect()
}

mod cdc_acm {
    use super::*;

    const CDC_CIF_INTERFACE: u8 = 0x00;
    const CDC_DIF_INTERFACE: u8 = 0x01;
    const USB_CDC_INT_EP: u8 = 0x81;
    const USB_CDC_IN_EP: u8 = 0x82;
    const USB_CDC_OUT_EP: u8 = 0x02;

    pub const DEVICE_DESCRIPTOR: [u8; 18] = to_array(
        Device {
            bcd_usb: 0x0200,
            device_class: 0x02,
            device_sub_class: 0x00,
            device_protocol: 0x00,
            max_packet_size0: 0x40,
            // pid.codes test VID/PID
            id_vendor: 0x1209,
            id_product: 0x0001,
            bcd_device: 0x0100,
            manufacturer_str_index: 1,
            product_str_index: 2,
            serial_number_str_index: 3,
            num_configurations: 1,
        }
        .build(),
    );

    pub const CONFIGURATION_DESCRIPTOR: [u8; 67] = checked_configuration(configuration!(
        Configuration {
            num_interfaces: 2,
            configuration_value: 1,
            configuration_str_index: 0,
            attributes: ConfigurationAttributes::BUS_POWERED,
            max_power: 0x32,
        },
        interface!(
            Interface {
                interface_number: CDC_CIF_INTERFACE,
                alternate_setting: 0,
                num_endpoints: 1,
                interface_class: 0x02,
                interface_sub_class: 0x02,
                interface_protocol: 0x01,
                interface_str_index: 0,
            },
            CdcHeaderDescriptor::new(0x0110),
            CdcCallManagementDescriptor::new(0x00, CDC_DIF_INTERFACE),
            CdcAcmDescriptor::new(0x02),
            CdcUnionDescriptor::new(CDC_CIF_INTERFACE, CDC_DIF_INTERFACE),
            Endpoint {
                address: USB_CDC_INT_EP,
                attributes: EndpointAttributes::INTERRUPT,
                max_packet_size: 0x10,
                interval: 0x10,
            }
            .build(),
        ),
        interface!(
            Interface {
                interface_number: CDC_DIF_INTERFACE,
                alternate_setting: 0,
                num_endpoints: 2,
                interface_class: 0x0A,
                interface_sub_class: 0x00,
                interface_protocol: 0x00,
                interface_str_index: 0,
            },
            Endpoint {
                address: USB_CDC_IN_EP,
                attributes: EndpointAttributes::BULK,
                max_packet_size: 0x40,
                interval: 0,
            }
            .build(),
            Endpoint {
                address: USB_CDC_OUT_EP,
                attributes: EndpointAttributes::BULK,
                max_packet_size: 0x40,
                interval: 0,
            }
            .build(),
        ),
    ));
}

mod hid_cdc {
    use super::*;

    const HID_INTERFACE: u8 = 0x00;
    const HID_ENDPOINT: u8 = 0x81;
    const CDC_CIF_INTERFACE: u8 = 0x01;
    const CDC_DIF_INTERFACE: u8 = 0x02;
    const USB_CDC_IN_EP: u8 = 0x82;
    const USB_CDC_OUT_EP: u8 = 0x03;
    const USB_CDC_INT_EP: u8 = 0x83;

    // Length of the vendor-defined 64 byte in/out/feature report descriptor.
    const HID_REPORT_DESCRIPTOR_LEN: u16 = 33;

    pub const DEVICE_DESCRIPTOR: [u8; 18] = to_array(
        Device {
            bcd_usb: 0x0200,
            // Miscellaneous / common class / IAD, needed for composite devices.
            device_class: 0xEF,
            device_sub_class: 0x02,
            device_protocol: 0x01,
            max_packet_size0: 0x40,
            id_vendor: 0x1209,
            id_product: 0x0002,
            bcd_device: 0x0100,
            manufacturer_str_index: 1,
            product_str_index: 2,
            serial_number_str_index: 0,
            num_configurations: 1,
        }
        .build(),
    );

    pub const CONFIGURATION_DESCRIPTOR: [u8; 100] = checked_configuration(configuration!(
        Configuration {
            num_interfaces: 3,
            configuration_value: 1,
            configuration_str_index: 0,
            attributes: ConfigurationAttributes::BUS_POWERED,
            max_power: 0x32,
        },
        interface!(
            Interface {
                interface_number: HID_INTERFACE,
                alternate_setting: 0,
                num_endpoints: 1,
                interface_class: 0x03,
                interface_sub_class: 0,
                interface_protocol: 0,
                interface_str_index: 0,
            },
            HidDescriptor::new(0x0111, 0, HID_REPORT_DESCRIPTOR_LEN),
            Endpoint {
                address: HID_ENDPOINT,
                attributes: EndpointAttributes::INTERRUPT,
                max_packet_size: 64,
                interval: 6,
            }
            .build(),
        ),
        InterfaceAssociation {
            first_interface: CDC_CIF_INTERFACE,
            interface_count: 2,
            function_class: 0x02,
            function_sub_class: 0x02,
            function_protocol: 0x00,
            function_str_index: 0x04,
        }
        .build(),
        interface!(
            Interface {
                interface_number: CDC_CIF_INTERFACE,
                alternate_setting: 0,
                num_endpoints: 1,
                interface_class: 0x02,
                interface_sub_class: 0x02,
                interface_protocol: 0,
                interface_str_index: 0x04,
            },
            CdcHeaderDescriptor::new(0x0110),
            CdcCallManagementDescriptor::new(0x01, CDC_DIF_INTERFACE),
            CdcAcmDescriptor::new(0x02),
            CdcUnionDescriptor::new(CDC_CIF_INTERFACE, CDC_DIF_INTERFACE),
            Endpoint {
                address: USB_CDC_INT_EP,
                attributes: EndpointAttributes::INTERRUPT,
                max_packet_size: 0x10,
                interval: 2,
            }
            .build(),
        ),
        interface!(
            Interface {
                interface_number: CDC_DIF_INTERFACE,
                alternate_setting: 0,
                num_endpoints: 2,
                interface_class: 0x0A,
                interface_sub_class: 0x00,
                interface_protocol: 0,
                interface_str_index: 0x04,
            },
            Endpoint {
                address: USB_CDC_IN_EP,
                attributes: EndpointAttributes::BULK,
                max_packet_size: 0x40,
                interval: 0,
            }
            .build(),
            Endpoint {
                address: USB_CDC_OUT_EP,
                attributes: EndpointAttributes::BULK,
                max_packet_size: 0x40,
                interval: 0,
            }
            .build(),
        ),
    ));
}
