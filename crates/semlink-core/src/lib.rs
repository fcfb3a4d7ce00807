//! semlink-core — tag-indexed semantic discovery.
//!
//! Devices host objects carrying name/value tags. A remote requester
//! sends a semantic query listing the tags an object must carry; the
//! device intersects them against its tag index and unicasts one
//! discovery reply per match. An identity-discovery exchange with an
//! instance-range filter rides the same transport. The client side pairs
//! asynchronous replies with the single outstanding request.
//!
//! Modules:
//! - [`tags`] — the tag index (pure data structure)
//! - [`service`] — device-side handlers behind an explicit registry
//! - [`correlate`] — client-side request/response correlation
//! - [`net`] — UDP responder node and discovery client
//! - [`config`] — device file loading
//! - [`protocol`] — JSON wire messages

pub mod config;
pub mod correlate;
pub mod device;
pub mod error;
pub mod net;
pub mod protocol;
pub mod service;
pub mod tags;
pub mod types;

pub use config::{default_device_file_path, load_device_file, DeviceFile};
pub use correlate::{CorrelatedReply, Correlator, PendingRequest, ReplyBody};
pub use device::LocalDevice;
pub use error::{ConfigError, CoreError, ProtocolError, Result};
pub use net::{DiscoveryClient, ResponderNode, DISCOVERY_PORT};
pub use types::{DeviceIdentity, LocalObject, ObjectId, Tag};
