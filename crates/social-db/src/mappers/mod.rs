//! Model -> entity conversions

mod guild;
mod user;
