mod build;
mod view;
