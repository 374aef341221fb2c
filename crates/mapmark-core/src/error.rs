use crate::marker::MarkerId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate marker id: {0}")]
    DuplicateId(MarkerId),
}
