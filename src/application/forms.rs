//! Draft input held by screens between keystrokes and submit.

use quill_api_types::{
    LoginRequest, OtpVerifyRequest, Post, PostId, ProfileUpdateRequest, RegisterRequest,
    ResetPasswordRequest,
};

use crate::application::api::PostDraft;
use crate::domain::attachments::Attachment;
use crate::domain::validation::{
    FieldErrors, check_comment, check_document, check_email, check_image, check_otp_code,
    check_password, check_text, check_username,
};

/// Create/edit form on the my-posts screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub image: Option<Attachment>,
    pub file: Option<Attachment>,
    editing: Option<PostId>,
    errors: FieldErrors,
}

impl PostForm {
    pub fn editing(&self) -> Option<PostId> {
        self.editing
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Pre-fill from an existing post. Attachments start empty; the API keeps
    /// the current ones unless new files are sent.
    pub fn begin_edit(&mut self, post: &Post) {
        *self = Self {
            title: post.title.clone(),
            content: post.content.clone(),
            editing: Some(post.id),
            ..Self::default()
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run the pre-submit checks, recording per-field messages.
    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::new();
        errors.check("title", check_text("Title", &self.title));
        errors.check("content", check_text("Content", &self.content));
        if let Some(image) = &self.image {
            errors.check("image", check_image(image));
        }
        if let Some(file) = &self.file {
            errors.check("file", check_document(file));
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            image: self.image.clone(),
            file: self.file.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentForm {
    pub content: String,
    errors: FieldErrors,
}

impl CommentForm {
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::new();
        errors.check("content", check_comment(&self.content));
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub username: Option<String>,
}

impl RegisterForm {
    pub fn into_request(self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("email", check_email(&self.email));
        if let Some(username) = self.username.as_deref() {
            errors.check("username", check_username(username));
        }
        errors.into_result()?;
        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            username: self.username,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerifyForm {
    pub email: String,
    pub code: String,
    pub password: String,
}

impl VerifyForm {
    pub fn into_request(self) -> Result<OtpVerifyRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("email", check_email(&self.email));
        errors.check("code", check_otp_code(&self.code));
        errors.check("password", check_password(&self.password));
        errors.into_result()?;
        Ok(OtpVerifyRequest {
            email: self.email.trim().to_string(),
            code: self.code.trim().to_string(),
            password: self.password,
        })
    }

    pub fn into_reset_request(self) -> Result<ResetPasswordRequest, FieldErrors> {
        let OtpVerifyRequest {
            email,
            code,
            password,
        } = self.into_request()?;
        Ok(ResetPasswordRequest {
            email,
            code,
            password,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn into_request(self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("email", check_email(&self.email));
        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        }
        errors.into_result()?;
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub email: String,
    pub username: Option<String>,
}

impl ProfileForm {
    pub fn into_request(self) -> Result<ProfileUpdateRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("email", check_email(&self.email));
        if let Some(username) = self.username.as_deref() {
            errors.check("username", check_username(username));
        }
        errors.into_result()?;
        Ok(ProfileUpdateRequest {
            email: self.email.trim().to_string(),
            username: self.username,
        })
    }
}

/// Shorten post content for list output.
pub fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let cut: String = content.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use quill_api_types::AuthorRef;

    use super::*;

    fn post() -> Post {
        Post {
            id: 4,
            title: "Existing title".into(),
            content: "Existing content".into(),
            author: AuthorRef {
                id: 1,
                email: "a@b.io".into(),
                username: None,
            },
            image: Some("http://cdn/x.png".into()),
            file: None,
            read_count: 0,
            likes_count: 0,
            is_liked: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn validate_collects_every_field() {
        let mut form = PostForm {
            title: "Hi".into(),
            content: "...content".into(),
            image: Some(Attachment::from_bytes("big.png", vec![0_u8; 6 * 1024 * 1024])),
            file: Some(Attachment::from_bytes("notes.txt", vec![0_u8; 10])),
            ..PostForm::default()
        };
        assert!(!form.validate());
        let errors = form.errors();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains("title"));
        assert!(errors.contains("content"));
        assert!(errors.contains("image"));
        assert_eq!(errors.get("file"), Some("File must be a PDF"));
    }

    #[test]
    fn begin_edit_prefills_and_clears_attachments() {
        let mut form = PostForm {
            image: Some(Attachment::from_bytes("a.png", vec![1])),
            ..PostForm::default()
        };
        form.begin_edit(&post());
        assert_eq!(form.editing(), Some(4));
        assert_eq!(form.title, "Existing title");
        assert!(form.image.is_none());
        assert!(form.validate());

        form.reset();
        assert_eq!(form, PostForm::default());
    }

    #[test]
    fn blank_comment_is_rejected() {
        let mut form = CommentForm {
            content: "   ".into(),
            ..CommentForm::default()
        };
        assert!(!form.validate());
        form.content = "Nice post".into();
        assert!(form.validate());
    }

    #[test]
    fn verify_form_checks_code_and_password() {
        let errors = VerifyForm {
            email: "a@b.io".into(),
            code: "12".into(),
            password: "weak".into(),
        }
        .into_request()
        .expect_err("invalid form");
        assert!(errors.contains("code"));
        assert!(errors.contains("password"));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn register_form_trims_email() {
        let request = RegisterForm {
            email: " a@b.io ".into(),
            username: None,
        }
        .into_request()
        .expect("valid form");
        assert_eq!(request.email, "a@b.io");
    }

    #[test]
    fn preview_truncates_long_content() {
        assert_eq!(preview("short", 150), "short");
        let long = "word ".repeat(40);
        let shortened = preview(&long, 150);
        assert!(shortened.ends_with("..."));
        assert!(shortened.chars().count() <= 153);
    }
}
