mod gateway;
mod storage;

pub use self::gateway::{
    Gateway, GatewayError, GatewayOperation, GatewayOutput, GatewayResult, ItemFields, ItemRow,
    CODE_INVALID_CREDENTIALS, CODE_MISSING_TABLE, CODE_SCHEMA_MISMATCH, CODE_TIMEOUT,
};
pub use self::storage::{
    Storage, StorageError, StorageOperation, StorageOutput, StorageResult,
};

pub use crux_core::render::Render;

use crate::event::Event;

pub type AppGateway = Gateway<Event>;
pub type AppStorage = Storage<Event>;
pub type AppRender = Render<Event>;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub gateway: Gateway<Event>,
    pub storage: Storage<Event>,
    pub render: Render<Event>,
}
