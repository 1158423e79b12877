mod commands;
mod render;
