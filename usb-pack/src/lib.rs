//! Const-evaluated USB descriptor sets.
//!
//! Records are plain `#[repr(C, packed)]` structs whose in-memory image is
//! their wire image. They are glued together with [`pack!`], which nests
//! them into [`Pack`] pairs, so an entire configuration descriptor set is a
//! single value that can live in a `const` or `static`:
//!
//! ```
//! use usb_pack::*;
//!
//! const CONFIG: [u8; 25] = checked_configuration(configuration!(
//!     Configuration {
//!         num_interfaces: 1,
//!         configuration_value: 1,
//!         configuration_str_index: 0,
//!         attributes: ConfigurationAttributes::BUS_POWERED,
//!         max_power: 50,
//!     },
//!     interface!(
//!         Interface {
//!             interface_number: 0,
//!             alternate_setting: 0,
//!             num_endpoints: 1,
//!             interface_class: 0x03,
//!             interface_sub_class: 0,
//!             interface_protocol: 0,
//!             interface_str_index: 0,
//!         },
//!         Endpoint {
//!             address: 0x81,
//!             attributes: EndpointAttributes::INTERRUPT,
//!             max_packet_size: 8,
//!             interval: 10,
//!         }
//!         .build(),
//!     ),
//! ));
//!
//! assert_eq!(CONFIG[2], 25);
//! ```

#![no_std]

mod descriptors;
mod error;
mod layout;
mod pack;
mod word;

pub use descriptors::*;
pub use error::Error;
pub use layout::*;
pub use pack::{to_array, Descriptor, Pack};
pub use word::{word, WordLe};
pub use zerocopy::AsBytes;
