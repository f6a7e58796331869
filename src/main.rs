//=========================================================================
// Lantern Festival Binary
//
// Opens the window on the built-in festival level. Log output is
// controlled through RUST_LOG (default: info).
//
//=========================================================================

use lantern_festival::{EngineBuilder, EngineError};

fn main() -> Result<(), EngineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    EngineBuilder::new().build()?.run()
}
