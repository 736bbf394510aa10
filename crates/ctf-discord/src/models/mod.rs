//! Discord REST wire models

mod channel;
mod command;
mod message;

pub use channel::{
    kind_to_wire, ChannelModel, CreateChannelBody, CreateRoleBody, MemberRolesBody,
    OverwriteModel, RenameChannelBody, RoleModel,
};
pub use command::{ApplicationCommand, CommandOption, CommandOptionType};
pub use message::{
    ActionRow, ButtonModel, EmbedFieldModel, EmbedFooter, EmbedModel, EmbedThumbnail,
    MessageModel, MessagePayload, EPHEMERAL,
};
