//! Prompt templates for each content type.
//!
//! Every function here is pure string interpolation: each input appears
//! verbatim in the output, along with the structural instructions the model
//! needs to produce ready-to-use copy.

use crate::content::ContentRequest;

/// System message sent ahead of every rendered prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert content writer for Digital Marketing.";

/// Used when a social platform has no dedicated style instruction.
pub const GENERIC_SOCIAL_STYLE: &str = "engaging social media post";

/// Social networks with a dedicated style instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    LinkedIn,
    TwitterX,
    Instagram,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::LinkedIn,
        Platform::TwitterX,
        Platform::Instagram,
        Platform::Facebook,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::TwitterX => "Twitter/X",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
        }
    }

    /// Matches a label exactly; "Twitter" and "X" are accepted for Twitter/X.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "LinkedIn" => Some(Platform::LinkedIn),
            "Twitter/X" | "Twitter" | "X" => Some(Platform::TwitterX),
            "Instagram" => Some(Platform::Instagram),
            "Facebook" => Some(Platform::Facebook),
            _ => None,
        }
    }

    pub fn style(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "Professional networking post with industry insights",
            Platform::TwitterX => "Concise, engaging tweet (max 280 characters)",
            Platform::Instagram => "Visual-focused caption with emojis and hashtags",
            Platform::Facebook => "Conversational post encouraging engagement",
        }
    }
}

/// Renders the prompt for any request.
pub fn render(request: &ContentRequest) -> String {
    match request {
        ContentRequest::BlogPost {
            topic,
            keywords,
            tone,
            word_count,
        } => blog_post(topic, keywords, tone, *word_count),
        ContentRequest::SocialPost {
            topic,
            platform,
            tone,
        } => social_post(topic, platform, tone),
        ContentRequest::AdCopy {
            product,
            target_audience,
            tone,
        } => ad_copy(product, target_audience, tone),
        ContentRequest::Email {
            purpose,
            audience,
            tone,
        } => email(purpose, audience, tone),
        ContentRequest::LandingPage {
            offer,
            target_audience,
            tone,
        } => landing_page(offer, target_audience, tone),
        ContentRequest::ProductDescription {
            product_name,
            features,
            tone,
        } => product_description(product_name, features, tone),
    }
}

pub fn blog_post(topic: &str, keywords: &str, tone: &str, word_count: u32) -> String {
    format!(
        "You are an expert content writer for a digital marketing agency.
Create a comprehensive, SEO-optimized blog post.

REQUIREMENTS:
- Topic: {topic}
- Target Keywords: {keywords}
- Tone: {tone}
- Word Count: {word_count} words (approximate)

STRUCTURE:
1. Compelling headline (H1)
2. Engaging introduction with hook
3. 4-6 main sections with subheadings (H2/H3)
4. Key takeaways or bullet points where appropriate
5. Strong conclusion with call-to-action
6. Naturally integrate keywords {keywords} throughout

QUALITY STANDARDS:
- Write in a {tone_lower} tone
- Use short paragraphs (2-4 sentences)
- Include actionable insights
- Make it scannable with subheadings
- Avoid fluff and filler content
- Focus on providing real value

Generate the complete blog post now:",
        tone_lower = tone.to_lowercase(),
    )
}

/// Unknown platforms get [`GENERIC_SOCIAL_STYLE`] but are still named in the
/// prompt.
pub fn social_post(topic: &str, platform: &str, tone: &str) -> String {
    let style = Platform::from_label(platform)
        .map(|p| p.style())
        .unwrap_or(GENERIC_SOCIAL_STYLE);

    format!(
        "You are a social media content creator. Create a {style}.

REQUIREMENTS:
- Topic: {topic}
- Platform: {platform}
- Tone: {tone}

GUIDELINES:
- Hook readers in the first line
- Include relevant hashtags (3-5)
- Add a clear call-to-action
- Make it shareable and engaging
- Use emojis appropriately (if suitable for platform)
- Encourage comments and interaction

Generate the post now:"
    )
}

pub fn ad_copy(product: &str, target_audience: &str, tone: &str) -> String {
    format!(
        "You are an advertising copywriter. Create compelling ad copy that converts.

PRODUCT/SERVICE:
{product}

TARGET AUDIENCE:
{target_audience}

TONE:
{tone}

Create THREE variations (A/B/C testing):

Each variation must include:
1. Attention-grabbing headline (max 10 words)
2. Body copy (2-3 sentences highlighting benefits)
3. Strong call-to-action (CTA)
4. Unique selling proposition (USP)

COPYWRITING PRINCIPLES:
- Focus on benefits, not just features
- Create urgency or scarcity (if appropriate)
- Address pain points
- Use power words
- Make the CTA clear and compelling

Format as:
---
VARIATION A:
Headline: ...
Body: ...
CTA: ...

VARIATION B:
Headline: ...
Body: ...
CTA: ...

VARIATION C:
Headline: ...
Body: ...
CTA: ...
---

Generate now:"
    )
}

pub fn email(purpose: &str, audience: &str, tone: &str) -> String {
    format!(
        "You are an email marketing specialist. Create a high-converting email.

EMAIL PURPOSE:
{purpose}

TARGET AUDIENCE:
{audience}

TONE:
{tone}

CREATE COMPLETE EMAIL:
1. Subject Line (compelling, max 50 characters)
2. Preview Text (supporting the subject line)
3. Email Body:
   - Personalized greeting
   - Strong opening line
   - Main message (3-4 paragraphs)
   - Clear call-to-action button text
   - P.S. line (additional incentive or urgency)

EMAIL BEST PRACTICES:
- Make subject line irresistible
- Keep paragraphs short (2-3 sentences)
- Use \"you\" language (customer-focused)
- Single clear CTA
- Mobile-friendly formatting
- Create urgency without being pushy

Generate the complete email now:"
    )
}

pub fn landing_page(offer: &str, target_audience: &str, tone: &str) -> String {
    format!(
        "You are a conversion copywriter. Create persuasive landing page copy.

OFFER:
{offer}

TARGET AUDIENCE:
{target_audience}

TONE:
{tone}

CREATE COMPLETE LANDING PAGE SECTIONS:

1. HERO SECTION:
   - Powerful headline (benefit-driven)
   - Subheadline (supporting detail)
   - Primary CTA button text

2. PROBLEM STATEMENT:
   - Identify the pain point (2-3 sentences)

3. SOLUTION:
   - How your offer solves it (3-4 sentences)

4. KEY BENEFITS (3-5 bullet points):
   - Benefit 1
   - Benefit 2
   - Benefit 3
   ...

5. SOCIAL PROOF:
   - Testimonial placeholder text (realistic quote)

6. FINAL CTA SECTION:
   - Urgency statement
   - CTA button text
   - Risk reversal (guarantee/trial info)

CONVERSION PRINCIPLES:
- Use emotional triggers
- Address objections
- Create urgency
- Build trust
- Make action easy

Generate now:"
    )
}

pub fn product_description(product_name: &str, features: &str, tone: &str) -> String {
    format!(
        "You are an e-commerce copywriter. Create a compelling product description.

PRODUCT:
{product_name}

KEY FEATURES:
{features}

TONE:
{tone}

CREATE PRODUCT DESCRIPTION:

1. OPENING LINE:
   - Hook that highlights main benefit

2. PRODUCT OVERVIEW:
   - What it is and why it matters (2-3 sentences)

3. KEY FEATURES & BENEFITS:
   - Feature 1 -> Benefit
   - Feature 2 -> Benefit
   - Feature 3 -> Benefit
   (Convert features into customer benefits)

4. USE CASES:
   - Ideal for... (who should buy this)

5. WHAT'S INCLUDED:
   - List of items in package

6. CLOSING:
   - Final persuasive statement with CTA

E-COMMERCE BEST PRACTICES:
- Lead with benefits, not features
- Use sensory language
- Address common questions
- Include SEO keywords naturally
- Make it scannable with formatting

Generate now:"
    )
}
