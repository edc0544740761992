// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Bridge to the hosted pneumonia-detection endpoint.
//!
//! Requests run on a background thread with a blocking HTTP client and
//! report back over an mpsc channel polled by the shell each frame.
//! The bridge gates locally: no request is issued without an image
//! payload, and never while one is already outstanding for the slot.

use crate::models::session::SLOT_COUNT;
use serde_json::Value;
use std::sync::mpsc::{channel, Receiver};

const DEFAULT_ENDPOINT: &str = "https://api.radview.example/v1/pneumonia";

/// Endpoint URL, overridable through `RADVIEW_AI_ENDPOINT`.
pub fn endpoint_from_env() -> String {
    std::env::var("RADVIEW_AI_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string())
}

/// Everything the endpoint needs for one inference.
pub struct DiagnosisRequest {
    pub image_png: Vec<u8>,
    pub patient_id: String,
    pub notes: String,
}

/// A successful inference result.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisReport {
    pub diagnosis: String,
    pub confidence: f64,
    pub processing_time: f64,
}

type DiagnosisResult = Result<DiagnosisReport, String>;

pub struct DiagnosisBridge {
    endpoint: String,
    in_flight: [Option<Receiver<DiagnosisResult>>; SLOT_COUNT],
}

impl DiagnosisBridge {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            in_flight: Default::default(),
        }
    }

    /// Whether a request is outstanding for `slot`.
    pub fn is_busy(&self, slot: usize) -> bool {
        self.in_flight[slot].is_some()
    }

    /// Submit an inference request for `slot`.
    ///
    /// Rejected locally, without any network traffic, when the slot has
    /// no image payload or already has a request outstanding. On `Err`
    /// no loading indicator should be shown.
    pub fn submit(&mut self, slot: usize, request: DiagnosisRequest) -> Result<(), String> {
        if request.image_png.is_empty() {
            return Err("No image available for this slot".to_string());
        }
        if self.is_busy(slot) {
            return Err("A diagnosis request is already running for this slot".to_string());
        }

        let (sender, receiver) = channel();
        self.in_flight[slot] = Some(receiver);
        let endpoint = self.endpoint.clone();

        std::thread::spawn(move || {
            let result = run_request(&endpoint, request);
            let _ = sender.send(result);
        });
        log::info!("Submitted diagnosis request for slot {}", slot);
        Ok(())
    }

    /// Poll for a finished request; clears the slot's busy state when
    /// one completes. At most one completion is returned per call.
    pub fn poll(&mut self) -> Option<(usize, DiagnosisResult)> {
        for slot in 0..SLOT_COUNT {
            let done = match &self.in_flight[slot] {
                Some(receiver) => receiver.try_recv().ok(),
                None => None,
            };
            if let Some(result) = done {
                self.in_flight[slot] = None;
                return Some((slot, result));
            }
        }
        None
    }
}

fn run_request(endpoint: &str, request: DiagnosisRequest) -> DiagnosisResult {
    let client = reqwest::blocking::Client::new();

    let image_part = reqwest::blocking::multipart::Part::bytes(request.image_png)
        .file_name("slice.png")
        .mime_str("image/png")
        .map_err(|e| format!("Failed to build request: {}", e))?;
    let form = reqwest::blocking::multipart::Form::new()
        .part("image", image_part)
        .text("patient_id", request.patient_id)
        .text("notes", request.notes);

    let response = client
        .post(endpoint)
        .multipart(form)
        .send()
        .map_err(|e| format!("Diagnosis service unreachable: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("Diagnosis service returned {}", status));
    }

    let json: Value = response
        .json()
        .map_err(|e| format!("Malformed diagnosis response: {}", e))?;
    parse_report(&json)
}

/// Extract a report from the service's JSON body.
fn parse_report(json: &Value) -> DiagnosisResult {
    let diagnosis = json
        .get("diagnosis")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing 'diagnosis' field".to_string())?
        .to_string();
    let confidence = json
        .get("confidence")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| "Missing 'confidence' field".to_string())?;
    let processing_time = json
        .get("processing_time")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| "Missing 'processing_time' field".to_string())?;

    Ok(DiagnosisReport {
        diagnosis,
        confidence,
        processing_time,
    })
}
