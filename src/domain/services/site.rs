//! Placeholder site content

use crate::domain::value_objects::Profile;

/// Index file name the profile serves
pub fn index_file(profile: Profile) -> &'static str {
    match profile {
        Profile::Static => "index.html",
        Profile::Dynamic => "index.php",
    }
}

/// Default index page, written only when the site has none
pub fn placeholder_page(profile: Profile) -> &'static str {
    match profile {
        Profile::Static => {
            "<!doctype html>\n<html>\n<head><title>It works</title></head>\n<body>\n<h1>It works</h1>\n<p>Replace www/index.html with your site.</p>\n</body>\n</html>\n"
        }
        Profile::Dynamic => {
            "<?php\n// Replace www/index.php with your application.\necho \"<h1>It works</h1>\";\necho \"<p>PHP \" . phpversion() . \"</p>\";\n"
        }
    }
}
