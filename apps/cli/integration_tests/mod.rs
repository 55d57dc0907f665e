mod args;
mod settings;
