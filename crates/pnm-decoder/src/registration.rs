/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Settings a host imaging framework needs to discover the decoder
//!
//! The tables here describe the decoder the way a Windows Imaging
//! Component registry entry does: class settings, output pixel formats,
//! signature patterns and per extension file associations. Writing them
//! goes through a [`ConfigStore`] the host provides, nothing here touches
//! a real registry.
//!
//! # Example
//! ```
//! use std::collections::BTreeMap;
//! use std::convert::Infallible;
//!
//! use pnm_decoder::registration::{register_decoder, ConfigStore, ConfigValue, Guid, RegistrationIds};
//!
//! #[derive(Default)]
//! struct Store(BTreeMap<(String, String), ConfigValue>);
//!
//! impl ConfigStore for Store {
//!     type Error = Infallible;
//!
//!     fn set_value(&mut self, key: &str, name: &str, value: ConfigValue) -> Result<(), Infallible> {
//!         self.0.insert((key.to_string(), name.to_string()), value);
//!         Ok(())
//!     }
//!     fn delete_tree(&mut self, key: &str) -> Result<(), Infallible> {
//!         self.0.retain(|(k, _), _| !k.starts_with(key));
//!         Ok(())
//!     }
//! }
//!
//! let decoder = Guid::new(0x6891bbe0, 0x2f92, 0x4f25, [0xb2, 0x8a, 0x5f, 0x1e, 0x2d, 0x08, 0x12, 0xf2]);
//! let ids = RegistrationIds::new(decoder, decoder, decoder, "Someone", "C:\\codec.dll");
//!
//! let mut store = Store::default();
//! register_decoder(&mut store, &ids).unwrap();
//!
//! let key = format!("SOFTWARE\\Classes\\CLSID\\{decoder}");
//! assert_eq!(
//!     store.0[&(key, "FriendlyName".to_string())],
//!     ConfigValue::Text("Netpbm Decoder".to_string())
//! );
//! ```
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};

use pnm_core::bit_depth::BitDepth;
use pnm_core::colorspace::ColorSpace;
use pnm_core::log::{debug, trace};

use crate::header::PnmFormat;
use crate::pixel_format::{PixelFormat, SUPPORTED_PIXEL_FORMATS};

/// A 128 bit class or format identifier
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8]
}

impl Guid {
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Guid {
        Guid {
            data1,
            data2,
            data3,
            data4
        }
    }
}

/// Registry form, `{xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}` in lowercase
impl Display for Guid {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{{{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}}}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

const fn wic_pixel_format(last: u8) -> Guid {
    Guid::new(
        0x6fddc324,
        0x4e03,
        0x4bfe,
        [0xb1, 0x85, 0x3d, 0x77, 0x76, 0x8d, 0xc9, last]
    )
}

/// Category every bitmap decoder registers an instance under
pub const BITMAP_DECODERS_CATEGORY: Guid = Guid::new(
    0x7ed96837,
    0x96f0,
    0x4812,
    [0xb2, 0x11, 0xf1, 0x3c, 0x24, 0x11, 0x7e, 0xd3]
);

/// Shell thumbnail provider interface
pub const THUMBNAIL_PROVIDER: Guid = Guid::new(
    0xe357fccd,
    0xa995,
    0x4576,
    [0xb0, 0x1f, 0x23, 0x46, 0x30, 0x15, 0x4e, 0x96]
);

/// The system photo thumbnail provider, which generates thumbnails
/// through any registered decoder
pub const PHOTO_THUMBNAIL_PROVIDER: Guid = Guid::new(
    0xc7657c4a,
    0x9f68,
    0x40fa,
    [0xa4, 0xdf, 0x96, 0xbc, 0x08, 0xeb, 0x35, 0x51]
);

pub const DESCRIPTION: &str = "Netpbm Codec";
pub const FRIENDLY_NAME: &str = "Netpbm Decoder";
pub const MIME_TYPES: &str = "image/x-portable-graymap,image/x-portable-pixmap";
pub const FILE_EXTENSIONS: &str = ".pgm,.ppm";
pub const SPEC_VERSION: &str = "1.0.0.0";
pub const COLOR_MANAGEMENT_VERSION: &str = "1.0.0.0";
/// Four part version, the crate version with a zero build number
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), ".0");
pub const ARBITRATION_PRIORITY: u32 = 10;

/// Signature bytes are compared in full
const PATTERN_MASK: [u8; 2] = [0xFF, 0xFF];

/// Per extension file associations
///
/// (file type name, extension, mime type)
pub const FILE_TYPES: [(&str, &str, &str); 2] = [
    ("pgmfile", ".pgm", "image/x-portable-graymap"),
    ("ppmfile", ".ppm", "image/x-portable-pixmap")
];

/// Identifier of the framework pixel format matching `format`
pub const fn pixel_format_guid(format: PixelFormat) -> Guid {
    match (format.colorspace(), format.bit_depth()) {
        (ColorSpace::Luma, BitDepth::Two) => wic_pixel_format(0x06),
        (ColorSpace::Luma, BitDepth::Four) => wic_pixel_format(0x07),
        (ColorSpace::Luma, BitDepth::Eight) => wic_pixel_format(0x08),
        (ColorSpace::Luma, BitDepth::Sixteen) => wic_pixel_format(0x0b),
        // only 24 bit RGB is ever produced
        (ColorSpace::RGB, _) => wic_pixel_format(0x0d)
    }
}

/// A value stored under a configuration key
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigValue {
    Dword(u32),
    Text(String),
    Binary(Vec<u8>)
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        ConfigValue::Dword(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<&[u8]> for ConfigValue {
    fn from(value: &[u8]) -> Self {
        ConfigValue::Binary(value.to_vec())
    }
}

/// Hierarchical key value storage provided by the host
///
/// Keys are `\` separated paths, an empty value name is the default
/// value of a key.
pub trait ConfigStore {
    type Error;

    /// Create `key` if needed and set `name` under it
    fn set_value(&mut self, key: &str, name: &str, value: ConfigValue) -> Result<(), Self::Error>;

    /// Remove `key` and everything below it
    fn delete_tree(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// Host specific identifiers written into the tables
#[derive(Copy, Clone, Debug)]
pub struct RegistrationIds<'a> {
    /// Class id of the decoder
    pub decoder:          Guid,
    /// Category the decoder registers an instance under
    pub category:         Guid,
    pub container_format: Guid,
    pub vendor:           Guid,
    pub author:           &'a str,
    /// Path of the module hosting the decoder
    pub module_path:      &'a str
}

impl<'a> RegistrationIds<'a> {
    /// Identifiers registering under [`BITMAP_DECODERS_CATEGORY`]
    pub const fn new(
        decoder: Guid, container_format: Guid, vendor: Guid, author: &'a str,
        module_path: &'a str
    ) -> RegistrationIds<'a> {
        RegistrationIds {
            decoder,
            category: BITMAP_DECODERS_CATEGORY,
            container_format,
            vendor,
            author,
            module_path
        }
    }

    fn class_key(&self) -> String {
        format!("SOFTWARE\\Classes\\CLSID\\{}", self.decoder)
    }

    fn category_instance_key(&self) -> String {
        format!(
            "SOFTWARE\\Classes\\CLSID\\{}\\Instance\\{}",
            self.category, self.decoder
        )
    }
}

/// Write every table describing the decoder into `store`
///
/// Stops at the first failing write.
pub fn register_decoder<S: ConfigStore>(
    store: &mut S, ids: &RegistrationIds
) -> Result<(), S::Error> {
    debug!("Registering decoder {}", ids.decoder);

    register_class(store, ids)?;

    let class_key = ids.class_key();

    for format in SUPPORTED_PIXEL_FORMATS {
        let key = format!("{}\\Formats\\{}", class_key, pixel_format_guid(format));
        store.set_value(&key, "", "".into())?;
    }

    for (index, format) in [PnmFormat::GrayscaleBinary, PnmFormat::ColorBinary]
        .into_iter()
        .enumerate()
    {
        register_pattern(store, &class_key, index, &format.magic())?;
    }

    for (type_name, extension, mime_type) in FILE_TYPES {
        register_file_type(store, type_name, extension, mime_type)?;
    }
    Ok(())
}

fn register_class<S: ConfigStore>(store: &mut S, ids: &RegistrationIds) -> Result<(), S::Error> {
    let key = ids.class_key();

    let settings: [(&str, ConfigValue); 15] = [
        ("ArbitrationPriority", ARBITRATION_PRIORITY.into()),
        ("Author", ids.author.into()),
        ("ColorManagementVersion", COLOR_MANAGEMENT_VERSION.into()),
        ("ContainerFormat", ids.container_format.to_string().into()),
        ("Description", DESCRIPTION.into()),
        ("FileExtensions", FILE_EXTENSIONS.into()),
        ("FriendlyName", FRIENDLY_NAME.into()),
        ("MimeTypes", MIME_TYPES.into()),
        ("SpecVersion", SPEC_VERSION.into()),
        ("SupportAnimation", 0_u32.into()),
        ("SupportChromaKey", 0_u32.into()),
        ("SupportLossless", 1_u32.into()),
        ("SupportMultiframe", 0_u32.into()),
        ("Vendor", ids.vendor.to_string().into()),
        ("Version", VERSION.into())
    ];
    for (name, value) in settings {
        store.set_value(&key, name, value)?;
    }

    let server_key = format!("{}\\InprocServer32", key);
    store.set_value(&server_key, "", ids.module_path.into())?;
    store.set_value(&server_key, "ThreadingModel", "Both".into())?;

    let instance_key = ids.category_instance_key();
    store.set_value(&instance_key, "FriendlyName", FRIENDLY_NAME.into())?;
    store.set_value(&instance_key, "CLSID", ids.decoder.to_string().into())?;

    Ok(())
}

fn register_pattern<S: ConfigStore>(
    store: &mut S, class_key: &str, index: usize, pattern: &[u8]
) -> Result<(), S::Error> {
    let key = format!("{}\\Patterns\\{}", class_key, index);

    trace!("Registering pattern {:?} at index {}", pattern, index);

    store.set_value(&key, "Length", (pattern.len() as u32).into())?;
    store.set_value(&key, "Position", 0_u32.into())?;
    store.set_value(&key, "Mask", ConfigValue::Binary(PATTERN_MASK.to_vec()))?;
    store.set_value(&key, "Pattern", pattern.into())
}

fn register_file_type<S: ConfigStore>(
    store: &mut S, type_name: &str, extension: &str, mime_type: &str
) -> Result<(), S::Error> {
    let extension_key = format!("SOFTWARE\\Classes\\{}", extension);

    store.set_value(&extension_key, "", type_name.into())?;
    store.set_value(&extension_key, "Content Type", mime_type.into())?;
    store.set_value(&extension_key, "PerceivedType", "image".into())?;

    store.set_value(
        "SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Explorer\\KindMap",
        extension,
        "picture".into()
    )?;

    let provider = PHOTO_THUMBNAIL_PROVIDER.to_string();

    store.set_value(
        &format!("SOFTWARE\\Classes\\{}\\ShellEx\\{}", type_name, THUMBNAIL_PROVIDER),
        "",
        provider.as_str().into()
    )?;
    store.set_value(
        &format!(
            "SOFTWARE\\Classes\\SystemFileAssociations\\{}\\ShellEx\\{}",
            extension, THUMBNAIL_PROVIDER
        ),
        "",
        provider.into()
    )?;

    // the legacy photo viewer opens anything it opens TIFF files with
    store.set_value(
        "SOFTWARE\\Microsoft\\Windows Photo Viewer\\Capabilities\\FileAssociations",
        extension,
        "PhotoViewer.FileAssoc.Tiff".into()
    )
}

/// Remove the class key and the category instance key
///
/// File associations are left in place. Both removals are attempted,
/// the first failure is returned.
pub fn unregister_decoder<S: ConfigStore>(
    store: &mut S, ids: &RegistrationIds
) -> Result<(), S::Error> {
    debug!("Unregistering decoder {}", ids.decoder);

    let class_result = store.delete_tree(&ids.class_key());
    let instance_result = store.delete_tree(&ids.category_instance_key());

    class_result.and(instance_result)
}
