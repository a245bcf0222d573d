pub(crate) mod role;
