mod controls;
mod details;
mod fps;
mod help;
mod panels;
