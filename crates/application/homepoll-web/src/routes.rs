//! Route definitions for the survey server.

/// All routes defined in the application.
pub const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/", "Entry routing - magic link or step 1"),
    ("GET", "/survey/step1", "Initial price-range question"),
    ("POST", "/survey/step1", "Save range choice, forward to step 2"),
    ("GET", "/survey/step2", "Continue-or-finish branch"),
    ("GET", "/survey/step3", "Follow-up questions"),
    ("POST", "/survey/step3", "Save follow-up answers"),
    ("GET", "/survey/success", "Terminal thank-you page"),
    ("GET", "/admin", "Admin dashboard"),
    ("GET", "/api/health", "Health check"),
    ("GET", "/api/responses", "Raw responses JSON"),
];

/// Print all routes.
pub fn print_routes() {
    println!("\nhomepoll routes:");
    println!("{:-<60}", "");
    for (method, path, desc) in ROUTES {
        println!("{:6} {:24} {}", method, path, desc);
    }
    println!();
}
