mod core_errors;
