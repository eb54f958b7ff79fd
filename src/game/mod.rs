pub mod bounds;
pub mod clock;
pub mod constants;
pub mod input;
pub mod input_queue;
pub mod player;
pub mod session;
