//! Application orchestration module

pub mod initialization;
pub mod execution;

pub use initialization::{
    load_configuration,
    configure_logging,
    create_colour_manager,
    create_store,
    resolve_feed_config,
};
pub use execution::{run_command, run_demo, run_list, run_watch};
