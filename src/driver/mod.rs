//! Browser driver abstraction

pub mod mock;
pub mod scripts;
pub mod traits;

pub use mock::{MockDom, MockDriver, MockElement, MockFault, MockNode};
pub use traits::{ElementHandle, ScriptArg, WebDriver, WebElement};
