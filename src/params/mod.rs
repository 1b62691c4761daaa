pub(crate) mod bundle;
pub(crate) mod generator;
pub(crate) mod validator;
