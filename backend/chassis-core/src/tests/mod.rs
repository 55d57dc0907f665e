mod async_op;
mod license_check;
mod session;
mod translator;
mod transport;
