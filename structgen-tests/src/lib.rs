//! Integration tests for structgen live in `tests/`.
