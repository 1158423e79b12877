mod helpers;
mod session_handle;
