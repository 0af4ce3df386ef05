//! Domain types shared across the sync pipeline.

mod attribution;
mod identifier;
mod order;
mod outcome;
mod request;
mod settings;

pub use attribution::{Attribution, UTM_CAMPAIGN, UTM_MEDIUM, UTM_SOURCE, UTM_TERM};
pub use identifier::{Identifier, OrderId, ProductId};
pub use order::{LineItem, OrderRecord};
pub use outcome::{
    ANNOTATION_ERROR, ANNOTATION_RESPONSE_BODY, ANNOTATION_RESPONSE_CODE, DeliveryOutcome,
};
pub use request::SyncRequest;
pub use settings::{ENABLED_KEY, SECRET_TOKEN_KEY, Settings, WEBHOOK_URL_KEY};
