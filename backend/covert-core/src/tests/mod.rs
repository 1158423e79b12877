mod option;
mod registry;
mod store;
mod support;
mod transport;
