pub mod clock;
pub mod credentials;
pub mod delivery;
pub mod events;
pub mod second_factor;
pub mod stores;
