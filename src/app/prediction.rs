//! Background workers for the prediction request and the service health
//! check, polled from the UI thread.

use super::{ArcplanApp, PendingHealthCheck, PendingPrediction, PlannedOutcome, PredictionOutcome};
use crate::predict::{self, PatientInput, PredictMode};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

fn perform_prediction(
    base_url: &str,
    timeout: Duration,
    mode: PredictMode,
    input: &PatientInput,
) -> PredictionOutcome {
    let result = predict::request_prediction(base_url, timeout, mode, input)
        .and_then(predict::PredictionResponse::into_plan);
    match result {
        Ok((plan, recommendation)) => PredictionOutcome::Success {
            plan,
            recommendation,
        },
        Err(err) => PredictionOutcome::Error(err.to_string()),
    }
}

impl ArcplanApp {
    pub(crate) fn start_prediction(&mut self) {
        if self.pending_prediction.is_some() {
            self.set_status("Prediction already in progress.");
            return;
        }
        let input = match self.form.patient_input() {
            Ok(input) => input,
            Err(missing) => {
                self.set_status(format!("Missing inputs: {}.", missing.join(", ")));
                return;
            }
        };
        let base_url = self.config.service.base_url.clone();
        let timeout = self.config.service.timeout();
        let mode = self.mode;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = perform_prediction(&base_url, timeout, mode, &input);
            let _ = tx.send(outcome);
        });
        self.pending_prediction = Some(PendingPrediction { rx });
        self.set_status(format!("Requesting {} plan…", mode.label()));
    }

    pub(crate) fn poll_prediction_job(&mut self) {
        let Some(job) = self.pending_prediction.take() else {
            return;
        };
        match job.rx.try_recv() {
            Ok(PredictionOutcome::Success {
                plan,
                recommendation,
            }) => {
                self.set_status(recommendation.clone());
                self.outcome = Some(PlannedOutcome {
                    plan,
                    recommendation,
                });
            }
            // A failed request leaves the previous plan and diagram untouched.
            Ok(PredictionOutcome::Error(err)) => {
                self.set_status(format!("Prediction failed: {err}"));
            }
            Err(TryRecvError::Empty) => {
                self.pending_prediction = Some(job);
            }
            Err(TryRecvError::Disconnected) => {
                self.set_status("Prediction failed: worker disconnected.");
            }
        }
    }

    pub(crate) fn start_health_check(&mut self) {
        if self.pending_health_check.is_some() {
            return;
        }
        let base_url = self.config.service.base_url.clone();
        let timeout = self.config.service.timeout();

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result =
                predict::check_service_health(&base_url, timeout).map_err(|err| err.to_string());
            let _ = tx.send(result);
        });
        self.pending_health_check = Some(PendingHealthCheck { rx });
        self.set_status("Checking prediction service…");
    }

    pub(crate) fn poll_health_check(&mut self) {
        let Some(job) = self.pending_health_check.take() else {
            return;
        };
        match job.rx.try_recv() {
            Ok(Ok(())) => self.set_status("Prediction service is reachable."),
            Ok(Err(err)) => self.set_status(format!("Service check failed: {err}")),
            Err(TryRecvError::Empty) => {
                self.pending_health_check = Some(job);
            }
            Err(TryRecvError::Disconnected) => {
                self.set_status("Service check failed: worker disconnected.");
            }
        }
    }
}
