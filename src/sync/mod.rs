pub(crate) mod config;
pub(crate) mod git;
pub(crate) mod hash;
pub(crate) mod run;
