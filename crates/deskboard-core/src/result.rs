use crate::error::DeskboardError;

pub type DeskResult<T> = Result<T, DeskboardError>;
