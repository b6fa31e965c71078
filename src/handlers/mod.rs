pub mod diagnostics;
pub mod entities;
pub mod events;
pub mod health;
pub mod locks;
pub mod sessions;

pub use diagnostics::*;
pub use entities::*;
pub use events::*;
pub use health::*;
pub use locks::*;
pub use sessions::*;
