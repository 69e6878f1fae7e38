//! CLI commands

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use gallery_core::validation::{
    ForgotPasswordForm, ImageFile, ResetPasswordForm, SigninForm, SignupForm, UpdateForm,
    UploadForm, VerifyForm,
};
use gallery_core::{Gallery, Image};
use gallery_http::GalleryClient;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account; a verification code is emailed
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Ten digit phone number
        #[arg(long)]
        phone: String,

        #[arg(long, env = "GALLERY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Confirm the emailed code and sign in
    Verify {
        #[arg(long)]
        email: String,

        /// Six digit code from the email
        #[arg(long)]
        code: String,
    },

    /// Sign in with email and password
    Signin {
        #[arg(long)]
        email: String,

        #[arg(long, env = "GALLERY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Request a password reset code
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Set a new password with the emailed code
    ResetPassword {
        #[arg(long)]
        email: String,

        #[arg(long)]
        code: String,

        /// The new password
        #[arg(long, env = "GALLERY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Show the current session
    Whoami,

    /// Manage images
    Images {
        #[command(subcommand)]
        command: ImageCommands,
    },
}

#[derive(Subcommand)]
pub enum ImageCommands {
    /// List images in display order
    List,

    /// Upload one or more images
    Upload {
        /// Image files (jpeg, png, gif or webp)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// One title per file, in the same order
        #[arg(long = "title", required = true)]
        titles: Vec<String>,
    },

    /// Change an image's title or file
    Update {
        id: String,

        /// New title (keeps the current one when omitted)
        #[arg(long)]
        title: Option<String>,

        /// Replacement image file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Delete an image
    Delete { id: String },

    /// Move the image at one position to another
    Move { from: usize, to: usize },
}

impl Commands {
    pub async fn execute(self, client: &GalleryClient) -> Result<()> {
        match self {
            Commands::Signup {
                name,
                email,
                phone,
                password,
            } => {
                let form = SignupForm {
                    name,
                    email,
                    phone,
                    confirm_password: password.clone(),
                    password,
                };
                let message = client.signup(&form).await?;
                println!("{}", or_default(message, "Check your email for a verification code"));
                Ok(())
            }
            Commands::Verify { email, code } => {
                let form = VerifyForm {
                    email,
                    cache_code: code,
                };
                let session = client.verify_email(&form).await?;
                println!("Verified. Signed in as {}", session.email.unwrap_or_default());
                Ok(())
            }
            Commands::Signin { email, password } => {
                let session = client.signin(&SigninForm { email, password }).await?;
                println!("Signed in as {}", session.email.unwrap_or_default());
                Ok(())
            }
            Commands::ForgotPassword { email } => {
                let message = client.forgot_password(&ForgotPasswordForm { email }).await?;
                println!("{}", or_default(message, "Check your email for a reset code"));
                Ok(())
            }
            Commands::ResetPassword {
                email,
                code,
                password,
            } => {
                let form = ResetPasswordForm {
                    cache_code: code,
                    confirm_password: password.clone(),
                    password,
                    email,
                };
                let message = client.reset_password(&form).await?;
                println!("{}", or_default(message, "Password updated"));
                Ok(())
            }
            Commands::Logout => {
                client.logout().await;
                println!("Signed out");
                Ok(())
            }
            Commands::Whoami => {
                let session = client.session();
                if session.is_authenticated {
                    println!("Signed in as {}", session.email.as_deref().unwrap_or("<unknown>"));
                } else {
                    println!("Not signed in");
                }
                Ok(())
            }
            Commands::Images { command } => command.execute(client).await,
        }
    }
}

impl ImageCommands {
    pub async fn execute(self, client: &GalleryClient) -> Result<()> {
        match self {
            ImageCommands::List => {
                let gallery = Gallery::new(client.list_images().await?);
                if gallery.is_empty() {
                    println!("No images yet");
                }
                print_images(gallery.images());
                Ok(())
            }
            ImageCommands::Upload { files, titles } => {
                let mut images = Vec::with_capacity(files.len());
                for path in &files {
                    images.push(read_image(path).await?);
                }
                let form = UploadForm {
                    files: images,
                    titles,
                };
                let uploaded = client.upload_images(&form).await?;
                info!(count = uploaded.len(), "Uploaded images");
                print_images(&uploaded);
                Ok(())
            }
            ImageCommands::Update { id, title, file } => {
                let title = match title {
                    Some(title) => title,
                    None => current_title(client, &id).await?,
                };
                let file = match file {
                    Some(path) => Some(read_image(&path).await?),
                    None => None,
                };
                let updated = client.update_image(&id, &UpdateForm { title, file }).await?;
                print_images(std::slice::from_ref(&updated));
                Ok(())
            }
            ImageCommands::Delete { id } => {
                let message = client.delete_image(&id).await?;
                println!("{}", or_default(message, "Image deleted"));
                Ok(())
            }
            ImageCommands::Move { from, to } => move_image(client, from, to).await,
        }
    }
}

async fn move_image(client: &GalleryClient, from: usize, to: usize) -> Result<()> {
    let mut gallery = Gallery::new(client.list_images().await?);
    let result = reorder_and_save(client, &mut gallery, from, to).await;
    print_images(gallery.images());
    result
}

/// Reorder locally, then persist; the local order is rolled back if the
/// server rejects it
async fn reorder_and_save(
    client: &GalleryClient,
    gallery: &mut Gallery,
    from: usize,
    to: usize,
) -> Result<()> {
    gallery.move_image(from, to)?;

    match client.change_order(&gallery.pending_order()).await {
        Ok(_) => {
            gallery.mark_saved();
            Ok(())
        }
        Err(e) => {
            gallery.rollback();
            warn!("Saving the new order failed, restored previous order");
            Err(e).context("Failed to save the new order")
        }
    }
}

async fn current_title(client: &GalleryClient, id: &str) -> Result<String> {
    let images = client.list_images().await?;
    match images.into_iter().find(|image| image.id == id) {
        Some(image) => Ok(image.title),
        None => bail!("No image with id {id}"),
    }
}

async fn read_image(path: &Path) -> Result<ImageFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageFile::new(file_name, bytes))
}

fn print_images(images: &[Image]) {
    for image in images {
        println!("{:>3}  {}  {}  {}", image.order, image.id, image.title, image.image);
    }
}

fn or_default(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
