pub(crate) mod densify;
