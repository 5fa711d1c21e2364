use super::OutgoingEmail;

pub fn password_reset_email(to: &str, link: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        text: format!(
            "Someone asked to reset the password of your account.\n\n\
             Open this link to choose a new one:\n{link}\n\n\
             The link is valid for three days. If this was not you, ignore this email."
        ),
        html: Some(format!(
            "<p>Someone asked to reset the password of your account.</p>\
             <p><a href=\"{link}\">Reset password</a></p>\
             <p>The link is valid for three days. If this was not you, ignore this email.</p>"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_in_both_bodies() {
        let email = password_reset_email("a@b.c", "http://localhost:3000/reset-password/abc");
        assert_eq!(email.to, "a@b.c");
        assert!(email.text.contains("/reset-password/abc"));
        assert!(email.html.unwrap().contains("href=\"http://localhost:3000/reset-password/abc\""));
    }
}
