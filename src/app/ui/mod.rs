mod panels;
mod sections;
