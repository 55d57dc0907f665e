mod async_op;
mod error;
mod helpers;
mod licensing;
mod session;
