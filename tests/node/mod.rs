mod dependencies;
mod properties;
