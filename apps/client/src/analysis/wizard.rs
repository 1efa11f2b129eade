use crate::models::SubmissionForm;

/// The three steps of the analysis wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    UploadCv,
    PasteJobDescription,
    Analyze,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        WizardStep::UploadCv,
        WizardStep::PasteJobDescription,
        WizardStep::Analyze,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::UploadCv => "1. Upload CV",
            WizardStep::PasteJobDescription => "2. Paste JD",
            WizardStep::Analyze => "3. Analyze",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    pub step: WizardStep,
    pub active: bool,
    pub done: bool,
}

/// Stepper state. Nothing here is stored: it is recomputed from the form and
/// the presence of a result every time it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wizard {
    file_selected: bool,
    job_description_ready: bool,
    has_result: bool,
}

impl Wizard {
    pub fn new(form: &SubmissionForm, has_result: bool) -> Self {
        Self {
            file_selected: form.file.is_some(),
            job_description_ready: !form.job_description.trim().is_empty(),
            has_result,
        }
    }

    /// Step 1 stays highlighted alongside step 2 until the job description
    /// is filled in.
    pub fn steps(&self) -> [StepStatus; 3] {
        let (cv, jd) = (self.file_selected, self.job_description_ready);
        [
            StepStatus {
                step: WizardStep::UploadCv,
                active: !cv || !jd,
                done: cv,
            },
            StepStatus {
                step: WizardStep::PasteJobDescription,
                active: cv && !jd,
                done: jd,
            },
            StepStatus {
                step: WizardStep::Analyze,
                active: cv && jd,
                done: self.has_result,
            },
        ]
    }

    /// The earliest step still waiting on the user.
    pub fn current_step(&self) -> WizardStep {
        if !self.file_selected {
            WizardStep::UploadCv
        } else if !self.job_description_ready {
            WizardStep::PasteJobDescription
        } else {
            WizardStep::Analyze
        }
    }

    pub fn ready_to_analyze(&self) -> bool {
        self.file_selected && self.job_description_ready
    }
}
