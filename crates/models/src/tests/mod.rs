mod validation_tests;
mod status_tests;
mod template_tests;
