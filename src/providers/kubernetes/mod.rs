mod accessor;
mod client;
mod convert;

pub use accessor::KubernetesAccessor;
