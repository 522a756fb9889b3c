//! Unit tests for the promise runtime


mod combinators_test;
mod install_test;
