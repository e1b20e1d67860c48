pub(crate) mod controller;
pub(crate) mod placed;
pub(crate) mod state;
