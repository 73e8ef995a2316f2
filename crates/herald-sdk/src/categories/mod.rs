//! Per-category clients
//!
//! Each client turns a typed config into message content and runs it
//! through the shared [`MessagePipeline`](crate::MessagePipeline).

pub mod aggregate;
pub mod forget;
pub mod instance;
pub mod messages;
pub mod post;
pub mod program;
pub mod store;
pub mod vm;

pub use aggregate::{AggregateClient, AggregateConfig, AggregateContent};
pub use forget::{ForgetClient, ForgetConfig, ForgetContent};
pub use instance::{Hypervisor, InstanceClient, InstanceConfig, InstanceContent, InstanceEnvironment, RootfsVolume};
pub use messages::{MessageClient, MessagePage, StoredMessage};
pub use post::{PostClient, PostConfig, PostContent, AMEND_POST_TYPE};
pub use program::{
    CodeContent, CodeEncoding, FunctionEnvironment, FunctionTriggers, ProgramClient, ProgramConfig, ProgramContent,
    RuntimeReference,
};
pub use store::{StoreClient, StoreConfig, StoreContent};
pub use vm::{MachineResources, Payment, PaymentType, VolumeReference};
