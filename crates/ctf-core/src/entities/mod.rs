//! Domain entities - the persisted CTF and the platform objects around it

mod channel;
mod ctf;
mod event;
mod message;
mod role;

pub use channel::{Channel, ChannelCreate, ChannelKind, OverwriteKind, PermissionOverwrite};
pub use ctf::{Ctf, CtfFilter, CtfUpdate};
pub use event::{CalendarEvent, EventFilter};
pub use message::{Button, ButtonStyle, Embed, EmbedField, MessageCreate};
pub use role::{Role, RoleCreate};
