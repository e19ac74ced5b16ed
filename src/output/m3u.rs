//! M3U playlist export

use crate::checker::ProbeResult;
use crate::output::traits::{selected, single_line, ExportFormat, Exporter, OutputResult};

/// Writes an `#EXTM3U` playlist; with `include_unavailable = false` only
/// reachable channels are emitted
#[derive(Debug, Clone, Copy, Default)]
pub struct M3uExporter;

impl Exporter for M3uExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::M3u
    }

    fn render(&self, results: &[ProbeResult], include_unavailable: bool) -> OutputResult<String> {
        let mut playlist = String::from("#EXTM3U\n");

        for result in selected(results, include_unavailable) {
            let channel = result.channel();
            playlist.push_str(&format!(
                "#EXTINF:-1,{}\n{}\n",
                single_line(channel.display_name()),
                channel.url.trim()
            ));
        }

        Ok(playlist)
    }
}

/// Renders results as an M3U playlist
pub fn export_m3u(results: &[ProbeResult], include_unavailable: bool) -> OutputResult<String> {
    M3uExporter.render(results, include_unavailable)
}
