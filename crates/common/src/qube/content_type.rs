use mime::Mime;

wire_enum! {
    /// Content classification carried in the public metadata
    pub enum ContentType {
        Mp3 => "mp3",
        Mp4 => "mp4",
        Pdf => "pdf",
        Txt => "txt",
        Code => "Code",
        Other => "Other",
    }
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Other
    }
}

impl ContentType {
    /// Classify a file by its declared MIME type.
    ///
    /// Checked in order: `image/*` is `Other`, `video/*` is `mp4`,
    /// `audio/*` is `mp3`, any type mentioning `pdf` is `pdf`, `text/*` is `txt`.
    /// Anything else, including an unparseable type, is `Other`.
    pub fn classify(mime: &str) -> Self {
        let Ok(mime) = mime.trim().parse::<Mime>() else {
            return ContentType::Other;
        };

        if mime.type_() == mime::IMAGE {
            ContentType::Other
        } else if mime.type_() == mime::VIDEO {
            ContentType::Mp4
        } else if mime.type_() == mime::AUDIO {
            ContentType::Mp3
        } else if mime.essence_str().contains("pdf") {
            ContentType::Pdf
        } else if mime.type_() == mime::TEXT {
            ContentType::Txt
        } else {
            ContentType::Other
        }
    }
}
