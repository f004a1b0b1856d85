//! Unit tests for TIFF parsing and strip decoding


mod loader_tests;
