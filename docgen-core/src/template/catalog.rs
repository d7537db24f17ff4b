//! Static section layouts for the built-in document types.

use super::{DocumentType, Subsection, Template, TemplateSection};

const fn required(id: &'static str, title: &'static str) -> Subsection {
    Subsection { id, title, description: None, required: true, selectable: true }
}

const fn optional(id: &'static str, title: &'static str) -> Subsection {
    Subsection { id, title, description: None, required: false, selectable: true }
}

const fn described(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    required: bool,
) -> Subsection {
    Subsection { id, title, description: Some(description), required, selectable: true }
}

static SRS: Template = Template {
    key: DocumentType::Srs,
    name: "Software Requirements Specification (SRS)",
    description: "IEEE 830-1998 compliant requirements specification with detailed sections",
    category: "Requirements",
    icon: "FileText",
    standard: Some("IEEE 830-1998"),
    sections: &[
        TemplateSection {
            number: "1",
            title: "Introduction",
            description: Some("10,000-foot view of the overall project including purpose, scope, and intended audience"),
            subsections: &[
                Subsection { id: "1.1", title: "Purpose", description: Some("Describe the purpose of the product and intended audience"), required: true, selectable: false },
                described("1.2", "Product Scope", "Benefits, objectives, and goals intended for the product. Relate to overall business goals", true),
                described("1.3", "Product Value", "Why the product is important and how it will help the intended audience", true),
                described("1.4", "Intended Audience", "Describe the ideal audience and their characteristics", true),
                described("1.5", "Intended Use", "How the audience will use the product, including use cases", true),
                described("1.6", "Definitions, Acronyms, and Abbreviations", "Industry-specific terms, acronyms, and jargon definitions", true),
                described("1.7", "References", "External documents, standards, or resources referenced", false),
            ],
        },
        TemplateSection {
            number: "2",
            title: "System Requirements and Functional Requirements",
            description: Some("Detailed functional requirements that allow the system to perform as intended"),
            subsections: &[
                described("2.1", "System Features and Functions", "Break down system features that allow proper performance", true),
                described("2.2", "If/Then Behaviors", "Conditional logic and system responses", false),
                described("2.3", "Data Handling Logic", "How the system processes, stores, and retrieves data", true),
                described("2.4", "System Workflows", "Step-by-step processes and user journeys", true),
                described("2.5", "Transaction Handling", "How the system manages transactions and state", false),
                described("2.6", "Administrative Functions", "Admin panel, user management, and system administration", false),
                described("2.7", "Regulatory and Compliance Needs", "Legal, regulatory, and compliance requirements", false),
                described("2.8", "Performance Requirements", "Speed, response time, throughput, and performance metrics", true),
                described("2.9", "Screen Operations", "Details of operations conducted for every screen", false),
            ],
        },
        TemplateSection {
            number: "3",
            title: "External Interface Requirements",
            description: Some("Requirements ensuring the system communicates properly with external components"),
            subsections: &[
                described("3.1", "User Interfaces", "Content presentation, navigation, and user assistance", true),
                described("3.2", "Hardware Interfaces", "Characteristics of interfaces between software and hardware", false),
                described("3.3", "Software Interfaces", "Connections with databases, libraries, and operating systems", true),
                described("3.4", "Communication Interfaces", "Email, forms, APIs, and communication protocols", true),
            ],
        },
        TemplateSection {
            number: "4",
            title: "Non-Functional Requirements (NFRs)",
            description: Some("Determine HOW the system will implement features (the 'Itys')"),
            subsections: &[
                described("4.1", "Security", "Protection of sensitive information and data security measures", true),
                described("4.2", "Capacity", "Current and future storage needs, scaling plans", true),
                described("4.3", "Compatibility", "Minimum hardware requirements, OS support, browser compatibility", true),
                described("4.4", "Reliability and Availability", "Expected usage frequency and critical failure time", true),
                described("4.5", "Scalability", "Highest workloads under which system performs as expected", true),
                described("4.6", "Maintainability", "Continuous integration, deployment, and maintenance procedures", true),
                described("4.7", "Usability", "Ease of use, user experience, and accessibility", true),
                described("4.8", "Regulatory Requirements", "Compliance with industry standards and regulations", false),
                described("4.9", "Environmental Requirements", "Operating environment conditions and constraints", false),
            ],
        },
        TemplateSection {
            number: "Appendix",
            title: "Appendices",
            description: Some("Supporting materials, diagrams, and additional documentation"),
            subsections: &[
                described("A", "Data Flow Diagrams", "Visual representation of data flow through the system", false),
                described("B", "Use Case Diagrams", "User interaction scenarios and use cases", false),
                described("C", "System Architecture Diagrams", "High-level system architecture and component interactions", false),
            ],
        },
    ],
};

static SPRINT_REPORT: Template = Template {
    key: DocumentType::SprintReport,
    name: "Sprint Report",
    description: "Comprehensive agile sprint summary and metrics",
    category: "Agile",
    icon: "Calendar",
    standard: None,
    sections: &[
        TemplateSection {
            number: "1",
            title: "Executive Summary",
            description: None,
            subsections: &[
                required("1.1", "Sprint Overview"),
                required("1.2", "Sprint Goals Achievement"),
                required("1.3", "Overall Status"),
            ],
        },
        TemplateSection {
            number: "2",
            title: "Sprint Metrics",
            description: None,
            subsections: &[
                required("2.1", "Velocity and Capacity"),
                required("2.2", "Burndown Analysis"),
                required("2.3", "Task Completion Rate"),
                required("2.4", "Story Points Delivered"),
            ],
        },
        TemplateSection {
            number: "3",
            title: "Work Completed",
            description: None,
            subsections: &[
                required("3.1", "Completed Tasks"),
                required("3.2", "Key Achievements"),
                required("3.3", "Business Value Delivered"),
            ],
        },
        TemplateSection {
            number: "4",
            title: "Challenges and Blockers",
            description: None,
            subsections: &[
                required("4.1", "Blockers Encountered"),
                required("4.2", "Unfinished Work"),
                optional("4.3", "Risk Mitigation Actions"),
            ],
        },
        TemplateSection {
            number: "5",
            title: "Team Insights",
            description: None,
            subsections: &[
                required("5.1", "Team Performance"),
                required("5.2", "Workload Distribution"),
                required("5.3", "Process Improvements"),
            ],
        },
        TemplateSection {
            number: "6",
            title: "Next Steps",
            description: None,
            subsections: &[
                required("6.1", "Upcoming Sprint Goals"),
                required("6.2", "Action Items"),
                required("6.3", "Recommendations"),
            ],
        },
    ],
};

static ARCHITECTURE_DOC: Template = Template {
    key: DocumentType::ArchitectureDoc,
    name: "Software Architecture Document",
    description: "arc42-based architecture documentation",
    category: "Architecture",
    icon: "Layers",
    standard: Some("arc42"),
    sections: &[
        TemplateSection {
            number: "1",
            title: "Introduction and Goals",
            description: None,
            subsections: &[
                required("1.1", "Requirements Overview"),
                required("1.2", "Quality Goals"),
                required("1.3", "Stakeholders"),
            ],
        },
        TemplateSection {
            number: "2",
            title: "Architecture Constraints",
            description: None,
            subsections: &[
                required("2.1", "Technical Constraints"),
                optional("2.2", "Organizational Constraints"),
            ],
        },
        TemplateSection {
            number: "3",
            title: "System Scope and Context",
            description: None,
            subsections: &[
                required("3.1", "Business Context"),
                required("3.2", "Technical Context"),
            ],
        },
        TemplateSection {
            number: "4",
            title: "Solution Strategy",
            description: None,
            subsections: &[
                required("4.1", "Technology Decisions"),
                required("4.2", "System Decomposition"),
            ],
        },
        TemplateSection {
            number: "5",
            title: "Building Block View",
            description: None,
            subsections: &[
                required("5.1", "System Overview"),
                required("5.2", "Component Architecture"),
            ],
        },
        TemplateSection {
            number: "6",
            title: "Runtime View",
            description: None,
            subsections: &[
                required("6.1", "Key Scenarios"),
                required("6.2", "Component Interactions"),
            ],
        },
        TemplateSection {
            number: "7",
            title: "Deployment View",
            description: None,
            subsections: &[
                required("7.1", "Infrastructure Overview"),
                required("7.2", "Deployment Architecture"),
            ],
        },
        TemplateSection {
            number: "8",
            title: "Crosscutting Concepts",
            description: None,
            subsections: &[
                required("8.1", "Security Concepts"),
                required("8.2", "Error Handling Strategy"),
            ],
        },
        TemplateSection {
            number: "9",
            title: "Architecture Decisions",
            description: None,
            subsections: &[
                required("9.1", "Key Decisions and Rationale"),
            ],
        },
        TemplateSection {
            number: "10",
            title: "Quality Requirements",
            description: None,
            subsections: &[
                required("10.1", "Performance Requirements"),
                required("10.2", "Security Requirements"),
            ],
        },
        TemplateSection {
            number: "11",
            title: "Risks and Technical Debt",
            description: None,
            subsections: &[
                required("11.1", "Known Risks"),
                optional("11.2", "Technical Debt Items"),
            ],
        },
        TemplateSection {
            number: "12",
            title: "Glossary",
            description: None,
            subsections: &[
                required("12.1", "Terms and Definitions"),
            ],
        },
    ],
};

static USER_MANUAL: Template = Template {
    key: DocumentType::UserManual,
    name: "User Manual",
    description: "End-user documentation and guides",
    category: "User Documentation",
    icon: "BookOpen",
    standard: None,
    sections: &[
        TemplateSection {
            number: "1",
            title: "Introduction",
            description: None,
            subsections: &[
                required("1.1", "About This Manual"),
                required("1.2", "Intended Audience"),
                required("1.3", "System Requirements"),
            ],
        },
        TemplateSection {
            number: "2",
            title: "Getting Started",
            description: None,
            subsections: &[
                required("2.1", "Installation"),
                required("2.2", "First-Time Setup"),
                required("2.3", "Quick Start Guide"),
            ],
        },
        TemplateSection {
            number: "3",
            title: "Features and Functionality",
            description: None,
            subsections: &[
                required("3.1", "Core Features"),
                optional("3.2", "Advanced Features"),
            ],
        },
        TemplateSection {
            number: "4",
            title: "Step-by-Step Guides",
            description: None,
            subsections: &[
                required("4.1", "Common Tasks and Workflows"),
            ],
        },
        TemplateSection {
            number: "5",
            title: "Troubleshooting",
            description: None,
            subsections: &[
                required("5.1", "Common Issues and Solutions"),
                required("5.2", "Error Messages"),
                required("5.3", "Support Contact Information"),
            ],
        },
    ],
};

static API_DOCUMENTATION: Template = Template {
    key: DocumentType::ApiDocumentation,
    name: "API Documentation",
    description: "REST API reference and integration guide",
    category: "Technical",
    icon: "Code",
    standard: None,
    sections: &[
        TemplateSection {
            number: "1",
            title: "Overview",
            description: None,
            subsections: &[
                required("1.1", "Introduction"),
                required("1.2", "Base URL and Versioning"),
                required("1.3", "Authentication"),
            ],
        },
        TemplateSection {
            number: "2",
            title: "Getting Started",
            description: None,
            subsections: &[
                required("2.1", "Quick Start Guide"),
                required("2.2", "API Keys and Authorization"),
                required("2.3", "Rate Limiting"),
            ],
        },
        TemplateSection {
            number: "3",
            title: "API Reference",
            description: None,
            subsections: &[
                required("3.1", "Endpoints"),
                required("3.2", "Request/Response Format"),
                required("3.3", "Data Models"),
            ],
        },
        TemplateSection {
            number: "4",
            title: "Error Handling",
            description: None,
            subsections: &[
                required("4.1", "Error Codes and Messages"),
            ],
        },
        TemplateSection {
            number: "5",
            title: "Code Examples",
            description: None,
            subsections: &[
                required("5.1", "Sample Requests"),
                optional("5.2", "Integration Examples"),
            ],
        },
    ],
};

static TEST_PLAN: Template = Template {
    key: DocumentType::TestPlan,
    name: "Test Plan Document",
    description: "Comprehensive testing strategy and test cases",
    category: "Quality Assurance",
    icon: "CheckCircle",
    standard: None,
    sections: &[
        TemplateSection {
            number: "1",
            title: "Introduction",
            description: None,
            subsections: &[
                required("1.1", "Purpose and Scope"),
                required("1.2", "Test Objectives"),
            ],
        },
        TemplateSection {
            number: "2",
            title: "Test Strategy",
            description: None,
            subsections: &[
                required("2.1", "Test Approach"),
                required("2.2", "Test Levels"),
                required("2.3", "Test Types"),
            ],
        },
        TemplateSection {
            number: "3",
            title: "Test Environment",
            description: None,
            subsections: &[
                required("3.1", "Requirements"),
                required("3.2", "Test Tools"),
            ],
        },
        TemplateSection {
            number: "4",
            title: "Test Cases",
            description: None,
            subsections: &[
                required("4.1", "Functional Test Cases"),
                required("4.2", "Non-Functional Test Cases"),
            ],
        },
        TemplateSection {
            number: "5",
            title: "Test Schedule and Deliverables",
            description: None,
            subsections: &[
                required("5.1", "Test Timeline"),
                required("5.2", "Test Reports"),
            ],
        },
    ],
};

static PROJECT_CHARTER: Template = Template {
    key: DocumentType::ProjectCharter,
    name: "Project Charter",
    description: "Project authorization and high-level plan",
    category: "Project Management",
    icon: "Flag",
    standard: None,
    sections: &[
        TemplateSection {
            number: "1",
            title: "Project Overview",
            description: None,
            subsections: &[
                required("1.1", "Project Purpose"),
                required("1.2", "Project Description"),
                required("1.3", "Business Case"),
            ],
        },
        TemplateSection {
            number: "2",
            title: "Project Scope",
            description: None,
            subsections: &[
                required("2.1", "Objectives and Deliverables"),
                required("2.2", "Success Criteria"),
                required("2.3", "Out of Scope"),
            ],
        },
        TemplateSection {
            number: "3",
            title: "Stakeholders",
            description: None,
            subsections: &[
                required("3.1", "Project Sponsor"),
                required("3.2", "Project Team"),
                required("3.3", "Key Stakeholders"),
            ],
        },
        TemplateSection {
            number: "4",
            title: "Project Timeline and Budget",
            description: None,
            subsections: &[
                required("4.1", "Key Milestones"),
                required("4.2", "Resource Requirements"),
            ],
        },
        TemplateSection {
            number: "5",
            title: "Risks and Assumptions",
            description: None,
            subsections: &[
                required("5.1", "High-Level Risks"),
                required("5.2", "Key Assumptions"),
            ],
        },
    ],
};

static DESIGN_DOCUMENT: Template = Template {
    key: DocumentType::DesignDocument,
    name: "Design Document",
    description: "Detailed technical design specifications",
    category: "Design",
    icon: "Layout",
    standard: None,
    sections: &[
        TemplateSection {
            number: "1",
            title: "Introduction",
            description: None,
            subsections: &[
                required("1.1", "Purpose and Scope"),
                required("1.2", "Design Goals"),
            ],
        },
        TemplateSection {
            number: "2",
            title: "System Overview",
            description: None,
            subsections: &[
                required("2.1", "System Architecture"),
                required("2.2", "Component Overview"),
            ],
        },
        TemplateSection {
            number: "3",
            title: "Detailed Design",
            description: None,
            subsections: &[
                required("3.1", "Data Model"),
                required("3.2", "Component Interactions"),
            ],
        },
        TemplateSection {
            number: "4",
            title: "Interface Design",
            description: None,
            subsections: &[
                required("4.1", "User Interface"),
                required("4.2", "API Interfaces"),
            ],
        },
        TemplateSection {
            number: "5",
            title: "Database Design",
            description: None,
            subsections: &[
                required("5.1", "Schema Design"),
                required("5.2", "Data Dictionary"),
            ],
        },
        TemplateSection {
            number: "6",
            title: "Security Design",
            description: None,
            subsections: &[
                required("6.1", "Authentication and Authorization"),
                required("6.2", "Data Protection"),
            ],
        },
    ],
};

static TECHNICAL_SPEC: Template = Template {
    key: DocumentType::TechnicalSpec,
    name: "Technical Specification",
    description: "Detailed technical implementation specification",
    category: "Technical",
    icon: "FileCode",
    standard: None,
    sections: &[
        TemplateSection {
            number: "1",
            title: "Overview",
            description: None,
            subsections: &[
                required("1.1", "Technical Summary"),
                required("1.2", "Technology Stack"),
            ],
        },
        TemplateSection {
            number: "2",
            title: "System Components",
            description: None,
            subsections: &[
                required("2.1", "Backend Services"),
                required("2.2", "Frontend Components"),
                required("2.3", "Database Design"),
            ],
        },
        TemplateSection {
            number: "3",
            title: "Implementation Details",
            description: None,
            subsections: &[
                required("3.1", "Core Algorithms"),
                required("3.2", "Data Flow"),
            ],
        },
        TemplateSection {
            number: "4",
            title: "Integration Points",
            description: None,
            subsections: &[
                required("4.1", "External APIs"),
                optional("4.2", "Third-Party Services"),
            ],
        },
        TemplateSection {
            number: "5",
            title: "Deployment and Operations",
            description: None,
            subsections: &[
                required("5.1", "Deployment Architecture"),
                required("5.2", "Monitoring and Logging"),
            ],
        },
    ],
};

pub(super) static TEMPLATES: &[&Template] = &[
    &SRS,
    &SPRINT_REPORT,
    &ARCHITECTURE_DOC,
    &USER_MANUAL,
    &API_DOCUMENTATION,
    &TEST_PLAN,
    &PROJECT_CHARTER,
    &DESIGN_DOCUMENT,
    &TECHNICAL_SPEC,
];

pub(super) fn lookup(key: DocumentType) -> &'static Template {
    match key {
        DocumentType::Srs => &SRS,
        DocumentType::SprintReport => &SPRINT_REPORT,
        DocumentType::ArchitectureDoc => &ARCHITECTURE_DOC,
        DocumentType::UserManual => &USER_MANUAL,
        DocumentType::ApiDocumentation => &API_DOCUMENTATION,
        DocumentType::TestPlan => &TEST_PLAN,
        DocumentType::ProjectCharter => &PROJECT_CHARTER,
        DocumentType::DesignDocument => &DESIGN_DOCUMENT,
        DocumentType::TechnicalSpec => &TECHNICAL_SPEC,
    }
}
