pub mod export;
pub mod stripe;
pub mod trace;

pub mod util {
    pub mod env;
}
