use crate::{cli::OutputFormat, error::Result};
#[cfg(feature = "colored-output")]
use colored::*;
use hls::PlaybackTiming;
use platforms_parser::{
    mapping::ProviderMapping,
    media::{CatalogEntry, EpisodeRecord, QualityVariant, StreamDescriptor},
};
use serde::Serialize;
use std::io::Write;

pub struct OutputManager {
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn format_json<T: Serialize + ?Sized>(&self, value: &T, pretty: bool) -> Result<String> {
        let mut json = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        json.push('\n');
        Ok(json)
    }

    fn format_with<T, F>(&self, value: &T, format: OutputFormat, pretty: F) -> Result<String>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        match format {
            OutputFormat::Pretty => Ok(pretty(value)),
            OutputFormat::Json => self.format_json(value, true),
            OutputFormat::JsonCompact => self.format_json(value, false),
        }
    }

    fn field(&self, output: &mut String, indent: usize, key: &str, value: &str, color: Color) {
        output.push_str(&format!(
            "{:indent$}{}: {}\n",
            "",
            self.colorize(key, Color::Yellow, false),
            self.colorize(value, color, false)
        ));
    }

    pub fn format_catalog(&self, entries: &[CatalogEntry], format: OutputFormat) -> Result<String> {
        self.format_with(entries, format, |entries| {
            let mut output = String::new();
            if entries.is_empty() {
                output.push_str(&self.colorize("No results", Color::Yellow, true));
                output.push('\n');
            }
            for entry in entries {
                self.push_entry(&mut output, entry);
                output.push('\n');
            }
            output
        })
    }

    fn push_entry(&self, output: &mut String, entry: &CatalogEntry) {
        output.push_str(&self.colorize(entry.title.display(), Color::Green, true));
        output.push('\n');
        self.field(output, 2, "ID", &entry.id, Color::Cyan);
        if let Some(id_mal) = entry.id_mal {
            self.field(output, 2, "MAL ID", &id_mal.to_string(), Color::Cyan);
        }
        if !entry.title.romaji.is_empty() && entry.title.romaji != entry.title.display() {
            self.field(output, 2, "Romaji", &entry.title.romaji, Color::Cyan);
        }
        if let Some(year) = entry.year {
            self.field(output, 2, "Year", &year.to_string(), Color::Cyan);
        }
        if let Some(episodes) = entry.total_episodes {
            self.field(output, 2, "Episodes", &episodes.to_string(), Color::Cyan);
        }
        if !entry.genres.is_empty() {
            self.field(output, 2, "Genres", &entry.genres.join(", "), Color::Cyan);
        }
        if let Some(cover) = &entry.cover_image {
            self.field(output, 2, "Cover URL", cover, Color::Blue);
        }
    }

    pub fn format_mapping(&self, mapping: &ProviderMapping, format: OutputFormat) -> Result<String> {
        self.format_with(mapping, format, |mapping| {
            let mut output = String::new();
            self.push_entry(&mut output, &mapping.media);
            if let Some(description) = &mapping.media.description {
                self.field(&mut output, 2, "Description", description, Color::Cyan);
            }
            for (label, entry) in [("Sub", &mapping.sub), ("Dub", &mapping.dub)] {
                let value = entry
                    .as_ref()
                    .map(|e| format!("{} ({})", e.title.display(), e.id))
                    .unwrap_or_else(|| "-".to_string());
                self.field(&mut output, 2, label, &value, Color::Cyan);
            }
            output
        })
    }

    pub fn format_episodes(&self, episodes: &[EpisodeRecord], format: OutputFormat) -> Result<String> {
        self.format_with(episodes, format, |episodes| {
            let mut output = String::new();
            output.push_str(&self.colorize(
                &format!("{} episodes", episodes.len()),
                Color::Green,
                true,
            ));
            output.push('\n');
            for episode in episodes {
                let number = episode
                    .number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".to_string());
                let dub = if episode.has_dub { " [dub]" } else { "" };
                output.push_str(&format!(
                    "  {:>4}  {}{}\n",
                    self.colorize(&number, Color::Yellow, false),
                    self.colorize(episode.title.as_deref().unwrap_or(&episode.id), Color::Cyan, false),
                    dub
                ));
            }
            output
        })
    }

    pub fn format_watch(&self, episode: &EpisodeRecord, format: OutputFormat) -> Result<String> {
        self.format_with(episode, format, |episode| {
            let mut output = String::new();
            let number = episode
                .number
                .map(|n| format!("Episode {n}"))
                .unwrap_or_else(|| "Episode".to_string());
            let heading = match &episode.title {
                Some(title) => format!("{number}: {title}"),
                None => number,
            };
            output.push_str(&self.colorize(&heading, Color::Green, true));
            output.push('\n');
            self.field(&mut output, 2, "ID", &episode.id, Color::Cyan);
            self.field(&mut output, 2, "Dub", &episode.has_dub.to_string(), Color::Cyan);
            match &episode.source {
                Some(descriptor) => self.push_stream(&mut output, descriptor),
                None => {
                    output.push_str(&self.colorize("No stream", Color::Yellow, true));
                    output.push('\n');
                }
            }
            output
        })
    }

    fn push_stream(&self, output: &mut String, descriptor: &StreamDescriptor) {
        output.push_str(&self.colorize("Stream Details:", Color::Green, true));
        output.push('\n');
        self.field(output, 2, "HLS", &descriptor.is_m3u8().to_string(), Color::Cyan);
        let (intro, outro) = (descriptor.intro(), descriptor.outro());
        self.field(
            output,
            2,
            "Intro",
            &format!("{:.0}s - {:.0}s", intro.start, intro.end),
            Color::Cyan,
        );
        self.field(
            output,
            2,
            "Outro",
            &format!("{:.0}s - {:.0}s", outro.start, outro.end),
            Color::Cyan,
        );
        if let Some(thumbnail) = descriptor.thumbnail() {
            self.field(output, 2, &thumbnail.kind, &thumbnail.url, Color::Blue);
        }

        output.push_str(&self.colorize("Qualities:", Color::Green, true));
        output.push('\n');
        self.push_variants(output, descriptor.qualities());

        for (label, urls) in [("Subtitles:", descriptor.subtitles()), ("Audio:", descriptor.audio())] {
            if urls.is_empty() {
                continue;
            }
            output.push_str(&self.colorize(label, Color::Green, true));
            output.push('\n');
            for url in urls {
                output.push_str(&format!("  {}\n", self.colorize(url, Color::Blue, false)));
            }
        }

        if !descriptor.headers().is_empty() {
            output.push_str(&self.colorize("Headers:", Color::Green, true));
            output.push('\n');
            let mut headers: Vec<_> = descriptor.headers().iter().collect();
            headers.sort();
            for (key, value) in headers {
                self.field(output, 2, key, value, Color::Cyan);
            }
        }
    }

    fn push_variants(&self, output: &mut String, variants: &[QualityVariant]) {
        for variant in variants {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize(&variant.name, Color::Yellow, true),
                self.colorize(&variant.url, Color::Blue, false)
            ));
            if variant.bandwidth > 0 {
                self.field(output, 4, "Bitrate", &format!("{} kbps", variant.bandwidth / 1000), Color::Cyan);
            }
            if !variant.resolution.is_empty() {
                self.field(output, 4, "Resolution", &variant.resolution, Color::Cyan);
            }
            if let Some(dub_url) = &variant.dub_url {
                self.field(output, 4, "Dub", dub_url, Color::Blue);
            }
        }
    }

    pub fn format_variants(&self, variants: &[QualityVariant], format: OutputFormat) -> Result<String> {
        self.format_with(variants, format, |variants| {
            let mut output = String::new();
            output.push_str(&self.colorize("Master playlist:", Color::Green, true));
            output.push('\n');
            self.push_variants(&mut output, variants);
            output
        })
    }

    pub fn format_timing(&self, timing: &PlaybackTiming, format: OutputFormat) -> Result<String> {
        self.format_with(timing, format, |timing| {
            let mut output = String::new();
            output.push_str(&self.colorize("Media playlist:", Color::Green, true));
            output.push('\n');
            self.field(
                &mut output,
                2,
                "Duration",
                &format!("{:.1}s", timing.total_duration),
                Color::Cyan,
            );
            self.field(
                &mut output,
                2,
                "Intro",
                &format!("{:.0}s - {:.0}s", timing.intro.start, timing.intro.end),
                Color::Cyan,
            );
            self.field(
                &mut output,
                2,
                "Outro",
                &format!("{:.0}s - {:.0}s", timing.outro.start, timing.outro.end),
                Color::Cyan,
            );
            output
        })
    }

    fn colorize(&self, text: &str, color: Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Green => text.green(),
                    Color::Yellow => text.yellow(),
                    Color::Blue => text.blue(),
                    Color::Cyan => text.cyan(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (color, bold, self.colored);
            text.to_string()
        }
    }
}

#[derive(Clone, Copy)]
enum Color {
    Green,
    Yellow,
    Blue,
    Cyan,
}

pub fn write_output(content: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
