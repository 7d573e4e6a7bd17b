mod clone;
mod execve;
mod exit;
mod thread;
mod wait;

pub use self::clone::*;
pub use self::execve::*;
pub use self::exit::*;
pub use self::thread::*;
pub use self::wait::*;
