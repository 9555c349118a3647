mod app;
mod execution;
mod loading;
mod registers;
